//! Key-value backends holding one serialized session

use crate::error::StoreError;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed key the session blob lives under
pub const DEFAULT_KEY: &str = "futureEthicsGameState";

/// Durable put/get/delete of a single blob
pub trait SessionStore: Debug + Send + Sync {
    /// Read the blob, `None` when nothing is stored
    ///
    /// # Errors
    /// Backend-specific read failure.
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob
    ///
    /// # Errors
    /// Backend-specific write failure.
    fn put(&self, blob: &str) -> Result<(), StoreError>;

    /// Remove the blob; absent blobs are not an error
    ///
    /// # Errors
    /// Backend-specific delete failure.
    fn delete(&self) -> Result<(), StoreError>;
}

/// Stores the blob as `<dir>/<key>.json`.
///
/// Writes go through a sibling temp file and a rename, so a crash never
/// leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    staging: PathBuf,
}

impl FileStore {
    /// Store under [`DEFAULT_KEY`] in `dir`
    #[inline]
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, DEFAULT_KEY)
    }

    /// Store under `key` in `dir`
    #[must_use]
    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            path: dir.join(format!("{key}.json")),
            staging: dir.join(format!(".{key}.json.tmp")),
        }
    }

    /// Location of the blob
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }

    fn put(&self, blob: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io_error(dir, e))?;
        }
        std::fs::write(&self.staging, blob).map_err(|e| StoreError::io_error(&self.staging, e))?;
        std::fs::rename(&self.staging, &self.path)
            .map_err(|e| StoreError::io_error(&self.path, e))
    }

    fn delete(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }
}

/// In-process store for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with `blob`
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// Current blob, for inspection
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.lock().clone())
    }

    fn put(&self, blob: &str) -> Result<(), StoreError> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<(), StoreError> {
        self.blob.lock().take();
        Ok(())
    }
}
