//! Directory-backed store: one file per key.
//!
//! Writes go to a hidden temp file in the same directory and are then
//! renamed over the target, so readers never see a half-written value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::errors::{Result, VaultError};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the store root.  The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(VaultError::StoreRead {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!(".{key}.tmp"));

        let write = || -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(&tmp_path, value)?;
            fs::rename(&tmp_path, &path)
        };

        write().map_err(|source| {
            // Leave no stray temp file behind.
            let _ = fs::remove_file(&tmp_path);
            VaultError::StoreWrite {
                key: key.to_string(),
                source,
            }
        })?;

        debug!(key, bytes = value.len(), "wrote store value");
        Ok(())
    }
}

/// Keys become file names, so keep them boring.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty, at most 128 characters, and not start with a period.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.');

    if valid {
        Ok(())
    } else {
        Err(VaultError::InvalidStoreKey(key.to_string()))
    }
}
