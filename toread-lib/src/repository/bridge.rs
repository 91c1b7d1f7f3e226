use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::repository::{
    record::Collection,
    storage::{Storage, StorageError},
};

/// Slot the collection is kept in unless configured otherwise
pub const DEFAULT_SLOT_KEY: &str = "toreads";

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("Failed to read slot `{key}`: {source}")]
    Read { key: String, source: StorageError },
    #[error("Slot `{key}` does not hold an encoded collection: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

/// Encode a collection as the JSON array kept in the storage slot.
pub fn encode(collection: &Collection) -> Result<String, serde_json::Error> {
    serde_json::to_string(collection)
}

pub fn decode(payload: &str) -> Result<Collection, serde_json::Error> {
    serde_json::from_str(payload)
}

/// Keeps a [`Collection`] in a single [`Storage`] slot.
#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    storage: Arc<dyn Storage>,
    key: String,
}

impl PersistenceBridge {
    pub fn new(storage: Arc<dyn Storage>, key: &str) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collection. Never fails: an empty or unreadable slot yields an empty
    /// collection, and a corrupt value is left where it is.
    pub fn restore(&self) -> Collection {
        match self.try_restore() {
            Ok(Some(collection)) => {
                debug!("Restored {} records from `{}`", collection.len(), self.key);
                collection
            }
            Ok(None) => {
                debug!("Nothing stored in `{}`, starting empty", self.key);
                Collection::default()
            }
            Err(err) => {
                error!("Starting with an empty list: {err}");
                Collection::default()
            }
        }
    }

    pub fn try_restore(&self) -> Result<Option<Collection>, RestoreError> {
        let payload = self
            .storage
            .read(&self.key)
            .map_err(|source| RestoreError::Read {
                key: self.key.clone(),
                source,
            })?;

        payload
            .map(|payload| decode(&payload))
            .transpose()
            .map_err(|source| RestoreError::Decode {
                key: self.key.clone(),
                source,
            })
    }

    /// Overwrite the slot with `collection`.
    pub fn persist(&self, collection: &Collection) -> Result<(), StorageError> {
        let payload = encode(collection)?;
        self.storage.write(&self.key, &payload)?;

        debug!("Persisted {} records to `{}`", collection.len(), self.key);

        Ok(())
    }
}
