//! Profile-local storage abstraction for `LibraryMS`.
//!
//! This crate defines the [`StorageBackend`] trait, a string key-value
//! interface with the same shape as a browser's `localStorage`. It knows
//! nothing about cookie categories or preference records; the consent store in
//! `libraryms-core` serializes its record before it reaches this layer.
//!
//! Two implementations are provided:
//!
//! - [`FileBackend`]: a single JSON document on disk, one per profile
//! - [`MemoryBackend`]: in-memory, for tests and throwaway sessions

mod error;
mod file_backend;
mod memory;

pub use error::StorageError;
pub use file_backend::FileBackend;
pub use memory::MemoryBackend;

/// A pluggable key-value storage backend.
///
/// Keys and values are UTF-8 strings. Writes overwrite the whole value stored
/// under a key; there is no partial update at this layer.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. This is idempotent; deleting a non-existent key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Delete`] if the underlying backend fails.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
