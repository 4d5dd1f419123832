//! Infrastructure layer: key-value persistence and the persisted inventory store.

pub mod inventory_store;
pub mod kv;

pub use inventory_store::{DeleteOutcome, ImportOutcome, InventoryStore, StoreError, StoreResult};
pub use kv::{
    FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError, StorageResult,
    write_atomic,
};
