use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::traits::KeyValueStore;

/// On-disk key-value store: one file per key under a single directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crashed write never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::Storage(format!(
                    "Failed to create store directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(Self { dir })
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let dir = dirs::data_dir()
            .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))?
            .join("newsdeck");
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!("Store file does not exist: {}", path.display());
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| {
            Error::Storage(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        Ok(Some(bytes))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, value).map_err(|e| {
            Error::Storage(format!("Failed to write '{}': {}", temp_path.display(), e))
        })?;

        fs::rename(&temp_path, &path).map_err(|e| {
            Error::Storage(format!("Failed to move '{}' into place: {}", temp_path.display(), e))
        })?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
