//! Inventory domain module.
//!
//! This crate contains business rules for small retail inventories, implemented
//! purely as deterministic domain logic (no IO, no storage). Every operation that
//! stamps a time takes `now` explicitly.

pub mod confirm;
pub mod filter;
pub mod profile;
pub mod reconcile;
pub mod record;
pub mod sanitize;
pub mod sku;
pub mod snapshot;
pub mod summary;

pub use confirm::Confirm;
pub use filter::FilterCriteria;
pub use profile::{CategoryPrefix, InventoryProfile, ProfileKind};
pub use reconcile::Discrepancy;
pub use record::{DEFAULT_NAME, ProductDraft, ProductPatch, ProductRecord};
pub use sanitize::{SanitizedBatch, coerce_count, coerce_count_str, coerce_price, coerce_price_str};
pub use snapshot::{BackupStatus, SNAPSHOT_VERSION, Snapshot, SnapshotMetadata};
pub use summary::InventorySummary;
