//! SKU allocation.

use stockroom_core::Sku;

/// Next `PREFIX-NNN` after the highest numeric suffix among `existing`.
///
/// Ids with the prefix but no digits count as 0; ids with another prefix are
/// ignored. Deterministic for a given input set.
pub fn next_sku<'a>(prefix: &str, existing: impl IntoIterator<Item = &'a Sku>) -> Sku {
    let max = existing
        .into_iter()
        .filter_map(|sku| sku.numeric_suffix(prefix))
        .max()
        .unwrap_or(0);

    tracing::debug!(prefix, max, "allocating next SKU");
    Sku::from_parts(prefix, max.saturating_add(1))
}
