//! Filesystem key-value backend.
//!
//! Stores each entry as a file under a base directory. Keys contain
//! characters that are unsafe in filenames (`:`, whitespace, arbitrary
//! unicode from normalized names), so the key is hex-encoded into the
//! filename and decoded back during enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use super::KvStore;
use crate::{Error, Result};

/// File extension for stored entries.
const ENTRY_EXT: &str = "kv";

/// Filesystem-based key-value store: `{base_path}/{hex(key)}.kv`.
pub struct FilesystemKvStore {
    /// Base directory for entry files.
    base_path: PathBuf,
}

impl FilesystemKvStore {
    /// Creates a new filesystem store rooted at `base_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let path = base_path.into();

        fs::create_dir_all(&path).map_err(|e| Error::OperationFailed {
            operation: "create_kv_dir".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self { base_path: path })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Maps a key to its file path.
    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{ENTRY_EXT}", hex::encode(key)))
    }

    /// Recovers the key from an entry filename, if it is one of ours.
    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl KvStore for FilesystemKvStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.entry_path(key), value).map_err(|e| Error::OperationFailed {
            operation: "fs_put".to_string(),
            cause: e.to_string(),
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::OperationFailed {
                operation: "fs_get".to_string(),
                cause: e.to_string(),
            })
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| Error::OperationFailed {
            operation: "fs_keys".to_string(),
            cause: e.to_string(),
        })?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            // Stray files that are not hex-named entries are skipped.
            if let Some(key) = Self::key_from_path(&entry.path())
                && key.starts_with(prefix)
            {
                keys.push(key);
            }
        }

        Ok(keys)
    }
}
