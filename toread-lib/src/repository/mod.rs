use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::{
    Result,
    repository::{
        config::{CoreConfig, Overrides},
        store::ListStore,
    },
};

mod bridge;
mod db;
mod ids;
mod record;
mod storage;
mod store;

pub mod config;

pub use bridge::{DEFAULT_SLOT_KEY, PersistenceBridge, RestoreError, decode, encode};
pub use db::Db;
pub use ids::{ClockIds, IdSource, IdSourceKind, SequentialIds};
pub use record::{Collection, Record, RecordId};
pub use storage::{MemoryStorage, Storage, StorageError};

/// Whether an intent made it to storage.
#[derive(Debug)]
pub enum Durability {
    /// The new collection was written to the storage slot
    Persisted,
    /// The intent changed nothing, so nothing was written
    Unchanged,
    /// The change was applied in memory but writing it failed
    Failed(StorageError),
}

/// The outcome of an intent.
#[derive(Debug)]
pub struct Update {
    /// The collection after the intent
    pub collection: Collection,
    pub durability: Durability,
}

impl Update {
    pub fn changed(&self) -> bool {
        !matches!(self.durability, Durability::Unchanged)
    }
}

/// Central access point for the to-read list.
///
/// The [`Repository`] restores the list from storage when it is opened, routes every intent
/// through the [`ListStore`] and writes the result back through the [`PersistenceBridge`].
/// Clones share the same list.
#[derive(Clone, Debug)]
pub struct Repository {
    store: Arc<RwLock<ListStore>>,
    bridge: PersistenceBridge,
}

impl Repository {
    /// Open the repository with the on-disk configuration, adjusted by `overrides`.
    pub fn new(overrides: &Overrides) -> Result<Self> {
        let mut cfg = CoreConfig::load()?;
        overrides.apply(&mut cfg);

        Self::from_config(&cfg, overrides.ephemeral)
    }

    /// Open the repository on the database `cfg` points at, or on memory storage when
    /// `ephemeral` is set.
    pub fn from_config(cfg: &CoreConfig, ephemeral: bool) -> Result<Self> {
        let storage: Arc<dyn Storage> = if ephemeral {
            Arc::new(MemoryStorage::default())
        } else {
            Arc::new(Db::open(&cfg.database_path()?)?)
        };

        Ok(Self::open(cfg, storage))
    }

    /// Restore the list from `storage` and build the store around it. Nothing can reach the
    /// store before the restore has finished.
    pub fn open(cfg: &CoreConfig, storage: Arc<dyn Storage>) -> Self {
        let bridge = PersistenceBridge::new(storage, cfg.slot_key());
        let restored = bridge.restore();
        let store = ListStore::new(restored, cfg.id_source().build());

        Self {
            store: Arc::new(RwLock::new(store)),
            bridge,
        }
    }

    pub fn collection(&self) -> Collection {
        self.store.read().collection().clone()
    }

    pub fn completed_count(&self) -> usize {
        self.store.read().collection().completed_count()
    }

    pub fn add(&self, text: &str, image_url: Option<&str>) -> Update {
        self.apply(|store| store.add(text, image_url))
    }

    pub fn toggle(&self, id: RecordId) -> Update {
        self.apply(|store| store.toggle(id))
    }

    pub fn delete(&self, id: RecordId) -> Update {
        self.apply(|store| store.delete(id))
    }

    /// Run an intent against the store, then persist whatever it produced. The store keeps the
    /// new collection even if persisting fails.
    fn apply<F>(&self, intent: F) -> Update
    where
        F: FnOnce(&mut ListStore) -> Collection,
    {
        let mut store = self.store.write();
        let before = store.collection().clone();
        let collection = intent(&mut store);

        if collection.same_snapshot(&before) {
            return Update {
                collection,
                durability: Durability::Unchanged,
            };
        }

        let durability = match self.bridge.persist(&collection) {
            Ok(()) => Durability::Persisted,
            Err(err) => {
                warn!("Change kept in memory but not saved: {err}");
                Durability::Failed(err)
            }
        };

        Update {
            collection,
            durability,
        }
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with in-memory storage and sequential ids.
    pub(crate) fn mock() -> Self {
        Self::mock_with(MemoryStorage::default())
    }

    #[cfg(test)]
    pub(crate) fn mock_with(storage: MemoryStorage) -> Self {
        Self::open(&CoreConfig::mock(), Arc::new(storage))
    }
}
