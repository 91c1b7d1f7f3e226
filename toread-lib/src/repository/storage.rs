use std::{collections::HashMap, fmt::Debug, io, sync::Arc};

use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("Failed to encode the collection {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Filesystem error {0}")]
    Io(#[from] io::Error),
    #[error("Slot `{0}` holds a value that is not text")]
    NotText(String),
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

/// A string keyed store of text slots.
pub trait Storage: Debug + Send + Sync {
    /// Returns the value in `key`, or `None` if nothing was ever written there.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Unconditionally overwrites `key` with `value`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps slots in process memory. Clones share the same slots.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn with_slot(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.slots.write().insert(key.into(), value.into());
        storage
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.write().insert(key.into(), value.into());
        Ok(())
    }
}
