//! In-memory storage backend.
//!
//! Stores all data in a `BTreeMap` behind a `RwLock`. Nothing survives the
//! process. Use this for unit tests and for sessions that must not leave a
//! profile on disk.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{StorageBackend, StorageError};

/// An in-memory storage backend backed by a `BTreeMap`.
///
/// Clones share the same underlying map, so a clone can stand in for "the
/// same profile after a reload" in tests.
///
/// # Examples
///
/// ```
/// # use libraryms_storage::{MemoryBackend, StorageBackend};
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// backend.put("cookie-preferences", "{}").await.unwrap();
/// let val = backend.get("cookie-preferences").await.unwrap();
/// assert_eq!(val.as_deref(), Some("{}"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let backend = MemoryBackend::new();
        let result = backend.get("does-not-exist").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let backend = MemoryBackend::new();
        backend.put("key", "v1").await.unwrap();
        backend.put("key", "v2").await.unwrap();
        let val = backend.get("key").await.unwrap();
        assert_eq!(val.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn delete_nonexistent_is_noop() {
        let backend = MemoryBackend::new();
        backend.delete("nope").await.unwrap();
        assert_eq!(backend.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_existing_key() {
        let backend = MemoryBackend::new();
        backend.put("key", "val").await.unwrap();
        backend.delete("key").await.unwrap();
        assert_eq!(backend.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        backend.put("key", "val").await.unwrap();
        assert_eq!(clone.get("key").await.unwrap().as_deref(), Some("val"));
    }
}
