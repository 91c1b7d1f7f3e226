use std::{path::Path, sync::Arc};

use agdb::{DbAny, DbError, DbKeyValue, DbValue, QueryBuilder};
use parking_lot::RwLock;
use tracing::debug;

use crate::repository::storage::{Storage, StorageError};

/// Alias of the node whose properties are the storage slots
const SLOTS: &str = "slots";

/// Durable [`Storage`] backed by an embedded agdb database.
#[derive(Debug, Clone)]
pub struct Db {
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    /// Open the database file at `path`, creating it if it doesn't exist.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let path_str = path.to_str().ok_or_else(|| {
            StorageError::Unavailable(format!("{} is not valid UTF-8", path.display()))
        })?;

        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str)?)),
        };

        db.init()?;

        debug!("Opened database at {}", path.display());

        Ok(db)
    }

    fn init(&self) -> Result<(), StorageError> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db
                .write()
                .exec_mut(QueryBuilder::insert().nodes().aliases([SLOTS]).query())?;
        }

        Ok(())
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_memory("test").unwrap())),
        };

        db.init().unwrap();

        db
    }
}

impl Storage for Db {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut result = match self
            .db
            .read()
            .exec(QueryBuilder::select().values(key).ids(SLOTS).query())
        {
            Ok(result) => result,
            Err(err) if is_missing_key(&err, key) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let value = result
            .elements
            .pop()
            .and_then(|mut element| element.values.pop())
            .map(|kv| kv.value);

        match value {
            None => Ok(None),
            Some(DbValue::String(text)) => Ok(Some(text)),
            Some(_) => Err(StorageError::NotText(key.to_string())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let kv: DbKeyValue = (key, value).into();
        self.db
            .write()
            .exec_mut(QueryBuilder::insert().values([[kv]]).ids(SLOTS).query())?;

        Ok(())
    }
}

/// Whether `err` is agdb reporting that `key` was never written.
fn is_missing_key(err: &DbError, key: &str) -> bool {
    // TODO: Match on DbError kind once the following is completed:
    // https://github.com/agnesoft/agdb/issues/1687
    err.description.starts_with(&format!("Missing key '{key}'"))
}
