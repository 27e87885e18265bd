//! In-memory storage implementation.
//!
//! Used by tests and by scratch projects that are never saved to disk.

use crate::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage. Not persistent.
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new in-memory storage.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Convert a key slice to a storage key string.
    fn key_to_string(key: &[&str]) -> String {
        key.join("/")
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read<T: DeserializeOwned + Send>(&self, key: &[&str]) -> StorageResult<Option<T>> {
        let key_str = Self::key_to_string(key);
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        match data.get(&key_str) {
            Some(json) => {
                let value: T = serde_json::from_str(json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + Send + Sync>(
        &self,
        key: &[&str],
        value: &T,
    ) -> StorageResult<()> {
        let key_str = Self::key_to_string(key);
        let json = serde_json::to_string(value)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.insert(key_str, json);

        Ok(())
    }

    async fn update<T, F>(&self, key: &[&str], editor: F) -> StorageResult<T>
    where
        T: DeserializeOwned + Serialize + Send + Sync + Default,
        F: FnOnce(&mut T) + Send,
    {
        let mut value: T = self.read(key).await?.unwrap_or_default();
        editor(&mut value);
        self.write(key, &value).await?;
        Ok(value)
    }

    async fn remove(&self, key: &[&str]) -> StorageResult<()> {
        let key_str = Self::key_to_string(key);
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        data.remove(&key_str);
        Ok(())
    }

    async fn list(&self, prefix: &[&str]) -> StorageResult<Vec<Vec<String>>> {
        let prefix_str = Self::key_to_string(prefix);
        let prefix_with_sep = if prefix_str.is_empty() {
            String::new()
        } else {
            format!("{prefix_str}/")
        };

        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        let results: Vec<Vec<String>> = data
            .keys()
            .filter_map(|k| {
                // Only direct children (one level below the prefix)
                let remainder = if prefix_str.is_empty() {
                    k.as_str()
                } else {
                    k.strip_prefix(&prefix_with_sep)?
                };

                if remainder.contains('/') {
                    return None;
                }

                Some(k.split('/').map(|s| s.to_string()).collect())
            })
            .collect();

        Ok(results)
    }

    async fn exists(&self, key: &[&str]) -> StorageResult<bool> {
        let key_str = Self::key_to_string(key);
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(data.contains_key(&key_str))
    }
}
