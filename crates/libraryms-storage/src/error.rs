//! Storage error types.
//!
//! Every variant carries the key or path involved so a failure can be
//! diagnosed from the log line alone.

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to read a value from storage.
    #[error("failed to read key '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Failed to write a value to storage.
    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Failed to delete a key from storage.
    #[error("failed to delete key '{key}': {reason}")]
    Delete { key: String, reason: String },

    /// The backing document exists but is not a JSON object of strings.
    #[error("storage document at '{path}' is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
}
