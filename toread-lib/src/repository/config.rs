use std::{
    fs, io,
    path::{Path, PathBuf},
};

use getset::{CopyGetters, Getters, Setters};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    fs::{config_dir, state_dir},
    repository::{bridge::DEFAULT_SLOT_KEY, ids::IdSourceKind},
};

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "core.toml";
const DATABASE_FILE_NAME: &str = "data.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access the configuration file {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize the configuration {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Per-run adjustments laid over the loaded [`CoreConfig`], usually from the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub id_source: Option<IdSourceKind>,
    /// Keep the list in memory instead of the database
    pub ephemeral: bool,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut CoreConfig) {
        if let Some(path) = &self.database {
            cfg.database = Some(path.clone());
        }
        if let Some(id_source) = self.id_source {
            cfg.id_source = id_source;
        }
    }
}

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    #[getset(get_copy = "pub")]
    version: u16,
    /// Storage slot holding the encoded list
    #[getset(get = "pub", set = "pub")]
    slot_key: String,
    /// Overrides the database location under the XDG state directory
    #[getset(set = "pub")]
    database: Option<PathBuf>,
    #[getset(get_copy = "pub", set = "pub")]
    id_source: IdSourceKind,
}

impl CoreConfig {
    /// Load the configuration from the XDG config directory, writing the defaults there if no
    /// file exists yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable configuration at {}: {err}",
                    path.display()
                );
                Self::default()
            }))
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    pub fn database(&self) -> Option<&Path> {
        self.database.as_deref()
    }

    /// Where the database lives: the configured override, or `data.db` in the state directory.
    pub fn database_path(&self) -> io::Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(state_dir()?.join(DATABASE_FILE_NAME)),
        }
    }

    /// Configuration for tests: deterministic ids, default slot.
    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self {
            id_source: IdSourceKind::Sequential,
            ..Self::default()
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            slot_key: DEFAULT_SLOT_KEY.into(),
            database: None,
            id_source: IdSourceKind::default(),
        }
    }
}
