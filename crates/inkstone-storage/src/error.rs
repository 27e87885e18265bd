//! Storage error types.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// A missing key is not an error: reads return `Ok(None)` and removes of
/// absent keys succeed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error (file not found, permission denied, quota exceeded, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid key format
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Lock was poisoned (another thread panicked while holding the lock)
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StorageError {
    /// Create an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey(message.into())
    }
}
