//! Process-local store backed by a locked map.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, StorageError, StorageResult, validate_key};

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate entries (e.g. a legacy blob) without validation side effects.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}
