//! Infrastructure implementation of the `BundleStore` port.
//!
//! `JsonBundleStore` keeps `bundles.json` in the data directory, guarded by
//! an advisory lock on `bdapt.lock`. Saves are atomic: the record is written
//! to a temp file in the same directory, synced, then renamed over the old one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use bdapt_common::BundleStorage;
use fs2::FileExt;

use crate::application::ports::BundleStore;
use crate::domain::StorageError;

pub const STORAGE_FILE: &str = "bundles.json";
pub const LOCK_FILE: &str = "bdapt.lock";

/// JSON bundle record under a data directory.
#[derive(Debug, Clone)]
pub struct JsonBundleStore {
    dir: PathBuf,
}

/// Exclusive store lock. Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release store lock");
        } else {
            tracing::debug!(path = %self.path.display(), "store lock released");
        }
    }
}

impl JsonBundleStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })
    }
}

impl BundleStore for JsonBundleStore {
    type Guard = StoreLock;

    fn lock(&self) -> Result<StoreLock, StorageError> {
        self.ensure_dir()?;
        let path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| StorageError::Lock {
                path: path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "store lock acquired");
                Ok(StoreLock { file, path })
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                tracing::debug!(path = %path.display(), "store lock already held");
                Err(StorageError::Locked { path })
            }
            Err(source) => Err(StorageError::Lock { path, source }),
        }
    }

    fn load(&self) -> Result<BundleStorage, StorageError> {
        let path = self.storage_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no bundle record yet");
                return Ok(BundleStorage::default());
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };
        let storage = serde_json::from_str(&content)
            .map_err(|source| StorageError::Parse { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "bundle record loaded");
        Ok(storage)
    }

    fn save(&self, storage: &BundleStorage) -> Result<(), StorageError> {
        self.ensure_dir()?;
        let path = self.storage_path();
        let write_err = |source: io::Error| StorageError::Write {
            path: path.clone(),
            source,
        };

        let mut content = serde_json::to_string_pretty(storage)
            .map_err(|e| write_err(io::Error::other(e)))?;
        content.push('\n');

        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        temp.write_all(content.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))
                .map_err(write_err)?;
        }

        temp.persist(&path).map_err(|e| write_err(e.error))?;
        tracing::debug!(path = %path.display(), bundles = storage.bundles.len(), "bundle record saved");
        Ok(())
    }
}
