//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using the key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to read a key.
    #[error("Read of {key} failed: {reason}")]
    ReadError { key: String, reason: String },

    /// Failed to write a key.
    #[error("Write of {key} failed: {reason}")]
    WriteError { key: String, reason: String },

    /// Key is not usable by this backend.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    pub(crate) fn read(key: &str, reason: impl ToString) -> Self {
        StorageError::ReadError {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(key: &str, reason: impl ToString) -> Self {
        StorageError::WriteError {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
