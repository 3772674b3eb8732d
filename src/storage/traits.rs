use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

/// Store keys, one per entity family. No cross-key transactions are needed:
/// each family lives under its own key.
pub mod keys {
    pub const SAVED_ARTICLES: &str = "saved_articles";
    pub const CACHED_SOURCES: &str = "cached_sources";
    pub const SELECTED_SOURCES: &str = "selected_sources";
}

/// Key-value blob storage seam. Implementations must provide atomic
/// single-key set/get.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
