//! Core of the to-read list: an ordered collection of book titles, the store that changes it
//! and the bridge that keeps it in durable storage between sessions.

use thiserror::Error;

pub mod fs;
pub mod pace;
pub mod repository;

pub use repository::Repository;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] repository::StorageError),
    #[error(transparent)]
    Config(#[from] repository::config::ConfigError),
    #[error("Filesystem error {0}")]
    Io(#[from] std::io::Error),
}
