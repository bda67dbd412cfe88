//! Cart Persistence Backends
//!
//! A small key/value interface standing in for browser local storage. The
//! engine treats every failure here as non-fatal.

use dashmap::DashMap;
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Failures of a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Key/value store for serialized cart snapshots
pub trait CartStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrites the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys and directory scopes may only use `[A-Za-z0-9_-]`.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Process-local storage, optionally capped like a browser quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects any single value larger than `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota: Some(quota),
        }
    }

    /// Writes a raw value, bypassing the quota.
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_string(), value.into());
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage rooted at `base/scope`, rejecting scopes that could escape `base`.
    pub fn scoped(base: &Path, scope: &str) -> Result<Self, StorageError> {
        if !is_safe_segment(scope) {
            return Err(StorageError::InvalidKey(scope.to_string()));
        }
        Ok(Self::new(base.join(scope)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if !is_safe_segment(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a half-written snapshot.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip_and_quota() {
        let storage = MemoryStorage::with_quota(8);
        assert!(storage.load("k").unwrap().is_none());

        storage.save("k", "[]").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("[]"));

        let err = storage.save("k", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 10, quota: 8 }));
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.load("ecommerce-cart").unwrap().is_none());
        storage.save("ecommerce-cart", "[1]").unwrap();
        assert_eq!(storage.load("ecommerce-cart").unwrap().as_deref(), Some("[1]"));
        assert!(storage.dir().join("ecommerce-cart.json").exists());
    }

    #[test]
    fn test_file_storage_rejects_unsafe_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.save("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(FileStorage::scoped(dir.path(), "a/b").is_err());
        assert!(FileStorage::scoped(dir.path(), "session-1").is_ok());
    }
}
