//! Key-value storage layer for inkstone.
//!
//! Everything inkstone persists — version histories, settings, project
//! records — goes through the [`Storage`] trait as a JSON round-trip.
//! Two backends are provided:
//! - JSON file storage (default, one file per key)
//! - In-memory storage (for tests and ephemeral scratch projects)

pub mod error;
pub mod json;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use json::JsonStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// A trait for key-value storage backends.
///
/// Keys are path segments, e.g. `["versions", "chapter", "chp_01hq..."]`.
/// Values are serialized/deserialized as JSON.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read a value from storage.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>>;

    /// Write a value to storage.
    ///
    /// Creates parent directories if necessary.
    async fn write<T: Serialize + Send + Sync>(&self, key: &[&str], value: &T)
        -> StorageResult<()>;

    /// Update a value in storage atomically.
    ///
    /// The editor function is called with the current value (or default if
    /// the key doesn't exist yet) and the edited value is written back.
    async fn update<T, F>(&self, key: &[&str], editor: F) -> StorageResult<T>
    where
        T: DeserializeOwned + Serialize + Send + Sync + Default,
        F: FnOnce(&mut T) + Send;

    /// Remove a value from storage.
    async fn remove(&self, key: &[&str]) -> StorageResult<()>;

    /// List all keys under a prefix.
    ///
    /// Returns the full key paths for each item.
    async fn list(&self, prefix: &[&str]) -> StorageResult<Vec<Vec<String>>>;

    /// Check if a key exists.
    async fn exists(&self, key: &[&str]) -> StorageResult<bool>;
}
