//! Key-value persistence: the local-storage equivalent.
//!
//! One key holds one whole value. There is no locking or versioning; the last
//! writer wins.

pub mod file;
pub mod memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::{FileKeyValueStore, write_atomic};
pub use memory::InMemoryKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage io error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored value for key {key:?} is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("storage lock poisoned")]
    Poisoned,
}

impl StorageError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            key: key.into(),
            source,
        }
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Whole-value key/value store abstraction.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Keys are used as file names by [`FileKeyValueStore`], so both backends accept
/// the same portable set: ASCII alphanumerics, `_`, `-` and `.`, not starting
/// with a dot.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
