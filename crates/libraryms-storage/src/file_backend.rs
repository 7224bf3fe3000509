//! JSON-file storage backend for the on-disk profile.
//!
//! The whole profile is one JSON object mapping keys to string values, the
//! same shape a browser keeps for an origin's `localStorage`. Every write
//! rewrites the document through a temporary file and a rename, so a crash
//! mid-write leaves either the old or the new document on disk.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::warn;

use crate::{StorageBackend, StorageError};

type Document = BTreeMap<String, String>;

/// A storage backend persisted as a single JSON document.
///
/// The file is created lazily on the first write. Read-modify-write cycles
/// are serialized through an internal lock; separate processes sharing the
/// same file are not coordinated.
///
/// # Examples
///
/// ```no_run
/// # use libraryms_storage::FileBackend;
/// let backend = FileBackend::open(".libraryms/profile.json");
/// ```
pub struct FileBackend {
    path: PathBuf,
    lock: Mutex<()>,
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileBackend {
    /// Use the document at `path`. Nothing is touched on disk until the
    /// first write.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Return the filesystem path of this profile document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self, key: &str) -> Result<Document, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    key: key.to_owned(),
                    reason: e.to_string(),
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load the document for a mutation. A corrupt document is discarded so
    /// the profile stays writable.
    async fn read_document_for_write(&self, key: &str) -> Result<Document, StorageError> {
        match self.read_document(key).await {
            Err(StorageError::Corrupt { path, reason }) => {
                warn!(path = %path, reason = %reason, "discarding corrupt profile document");
                Ok(Document::new())
            }
            other => other,
        }
    }

    async fn write_document(&self, key: &str, doc: &Document) -> Result<(), StorageError> {
        let write_err = |reason: String| StorageError::Write {
            key: key.to_owned(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| write_err(format!("cannot create {}: {e}", parent.display())))?;
        }

        let body = serde_json::to_string_pretty(doc).map_err(|e| write_err(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| write_err(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "cannot remove temporary profile file");
            }
            return Err(write_err(e.to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document(key).await?;
        Ok(doc.remove(key))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document_for_write(key).await?;
        doc.insert(key.to_owned(), value.to_owned());
        self.write_document(key, &doc).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut doc = self
            .read_document_for_write(key)
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_owned(),
                reason: e.to_string(),
            })?;
        if doc.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(key, &doc)
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_owned(),
                reason: e.to_string(),
            })
    }
}
