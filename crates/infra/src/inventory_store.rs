//! Persisted inventory store.
//!
//! Single source of truth for the product collection. Every mutation builds the
//! next collection, writes it wholesale under the profile's storage key and only
//! then swaps it in, so a failed write leaves memory equal to the last
//! successful save.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use stockroom_core::{DomainError, Entity, Sku};
use stockroom_inventory::sanitize::{extract_items, parse_import, sanitize_items};
use stockroom_inventory::{
    BackupStatus, Confirm, FilterCriteria, InventoryProfile, InventorySummary, ProductDraft,
    ProductPatch, ProductRecord, Snapshot,
};

use crate::kv::{KeyValueStore, StorageError};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize inventory: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a confirmed-or-not delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(ProductRecord),
    /// No record had that id; nothing was asked or changed.
    NotFound,
    /// The user declined.
    Cancelled,
}

/// Result of an import-replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Replaced { imported: usize, dropped: usize },
    Cancelled,
}

#[derive(Debug)]
pub struct InventoryStore<S> {
    storage: S,
    profile: InventoryProfile,
    items: Vec<ProductRecord>,
}

impl<S> InventoryStore<S>
where
    S: KeyValueStore,
{
    /// Load the collection: current key, then legacy key, then seed data.
    ///
    /// Stored records go through the same sanitizer as imports. A blob that is
    /// not JSON (or not a recognizable shape) fails the open and is left as is.
    pub fn open(storage: S, profile: InventoryProfile, now: DateTime<Utc>) -> StoreResult<Self> {
        let items = Self::load(&storage, &profile, now)?;
        tracing::info!(
            app = profile.app_name(),
            items = items.len(),
            "inventory store opened"
        );
        Ok(Self {
            storage,
            profile,
            items,
        })
    }

    fn load(
        storage: &S,
        profile: &InventoryProfile,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<ProductRecord>> {
        let mut found = storage
            .get(profile.storage_key())?
            .map(|raw| (profile.storage_key(), raw));

        if found.is_none() {
            if let Some(legacy) = profile.legacy_key() {
                if let Some(raw) = storage.get(legacy)? {
                    tracing::warn!(key = legacy, "reading inventory from legacy key");
                    found = Some((legacy, raw));
                }
            }
        }

        let Some((key, raw)) = found else {
            tracing::info!("no stored inventory, starting from seed data");
            return Ok(profile.seed_records(now));
        };

        let payload: Value =
            serde_json::from_str(&raw).map_err(|e| StorageError::corrupt(key, e.to_string()))?;
        let items =
            extract_items(&payload).map_err(|e| StorageError::corrupt(key, e.to_string()))?;
        Ok(sanitize_items(items, now).records)
    }

    /// Write the current collection under the profile's key.
    pub fn save(&self) -> StoreResult<()> {
        self.write(&self.items)
    }

    fn write(&self, items: &[ProductRecord]) -> StoreResult<()> {
        let blob = serde_json::to_string(items)?;
        self.storage.set(self.profile.storage_key(), &blob)?;
        Ok(())
    }

    fn commit(&mut self, next: Vec<ProductRecord>) -> StoreResult<()> {
        self.write(&next)?;
        self.items = next;
        Ok(())
    }

    pub fn profile(&self) -> &InventoryProfile {
        &self.profile
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn items(&self) -> &[ProductRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &Sku) -> Option<&ProductRecord> {
        self.position(id).map(|i| &self.items[i])
    }

    fn position(&self, id: &Sku) -> Option<usize> {
        self.items.iter().position(|r| r.id() == id)
    }

    /// Append a new record. Rejected with no change if the SKU already exists.
    pub fn add(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> StoreResult<&ProductRecord> {
        let record = draft.into_record(&self.profile, now)?;
        if self.position(&record.id).is_some() {
            tracing::warn!(sku = %record.id, "rejected duplicate SKU");
            return Err(DomainError::duplicate(record.id).into());
        }

        let sku = record.id.clone();
        let mut next = self.items.clone();
        next.push(record);
        self.commit(next)?;

        tracing::info!(%sku, total = self.items.len(), "product added");
        Ok(&self.items[self.items.len() - 1])
    }

    /// Overwrite the patch's fields in place. `Ok(None)` if the id is unknown.
    pub fn edit(
        &mut self,
        id: &Sku,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<&ProductRecord>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(sku = %id, "edit of unknown SKU ignored");
            return Ok(None);
        };

        let mut next = self.items.clone();
        patch.apply_to(&mut next[index], &self.profile, now)?;
        self.commit(next)?;

        tracing::info!(sku = %id, "product updated");
        Ok(Some(&self.items[index]))
    }

    /// Record a physical count. `Ok(None)` if the id is unknown.
    pub fn update_count(
        &mut self,
        id: &Sku,
        count: u64,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<&ProductRecord>> {
        let Some(index) = self.position(id) else {
            tracing::debug!(sku = %id, "count for unknown SKU ignored");
            return Ok(None);
        };

        let mut next = self.items.clone();
        next[index].set_physical_count(count, now);
        self.commit(next)?;

        let record = &self.items[index];
        tracing::info!(sku = %id, count, discrepancy = %record.discrepancy(), "physical count recorded");
        Ok(Some(record))
    }

    /// Remove the record with `id` after the user confirms.
    pub fn delete(&mut self, id: &Sku, confirm: &dyn Confirm) -> StoreResult<DeleteOutcome> {
        let Some(index) = self.position(id) else {
            return Ok(DeleteOutcome::NotFound);
        };

        if !confirm.confirm("¿Eliminar este producto?") {
            tracing::info!(sku = %id, "delete cancelled by user");
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut next = self.items.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        tracing::info!(sku = %id, total = self.items.len(), "product deleted");
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Matching records in collection order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&ProductRecord> {
        let found = criteria.apply(&self.items);
        tracing::debug!(matched = found.len(), total = self.items.len(), "inventory filtered");
        found
    }

    /// Propose the next SKU for `category`. Nothing is reserved.
    pub fn next_sku(&self, category: &str) -> StoreResult<Sku> {
        Ok(self.profile.next_sku(category, &self.items)?)
    }

    /// Replace the whole collection with the records in `raw`.
    ///
    /// The payload is parsed and sanitized first; malformed input fails before
    /// the user is asked anything.
    pub fn import_replace(
        &mut self,
        raw: &str,
        confirm: &dyn Confirm,
        now: DateTime<Utc>,
    ) -> StoreResult<ImportOutcome> {
        let batch = match parse_import(raw, now) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                return Err(e.into());
            }
        };

        let prompt = format!(
            "¿Reemplazar el inventario actual ({} productos) con {} productos importados?",
            self.items.len(),
            batch.records.len()
        );
        if !confirm.confirm(&prompt) {
            tracing::info!("import cancelled by user");
            return Ok(ImportOutcome::Cancelled);
        }

        let imported = batch.records.len();
        self.commit(batch.records)?;

        tracing::info!(imported, dropped = batch.dropped, "inventory replaced from import");
        Ok(ImportOutcome::Replaced {
            imported,
            dropped: batch.dropped,
        })
    }

    /// Backup envelope of the full collection.
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot::new(self.profile.app_name(), self.items.clone(), now)
    }

    /// Remember that a backup was written at `at`.
    pub fn record_backup(&self, at: DateTime<Utc>) -> StoreResult<()> {
        self.storage
            .set(&self.profile.backup_marker_key(), &at.to_rfc3339())?;
        Ok(())
    }

    pub fn last_backup(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let key = self.profile.backup_marker_key();
        let Some(raw) = self.storage.get(&key)? else {
            return Ok(None);
        };
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "ignoring unreadable backup marker");
                Ok(None)
            }
        }
    }

    pub fn backup_status(&self, now: DateTime<Utc>) -> StoreResult<BackupStatus> {
        Ok(BackupStatus::evaluate(self.last_backup()?, now))
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::compute(&self.items, self.profile.low_stock_threshold())
    }
}
