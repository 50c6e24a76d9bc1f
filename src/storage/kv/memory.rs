//! In-memory key-value backend.
//!
//! Used by tests and throwaway sessions; contents vanish with the process.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::KvStore;
use crate::{Error, Result};

/// In-memory key-value store backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    /// Keyed entries. `BTreeMap` gives stable enumeration order.
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKvStore {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|e| Error::OperationFailed {
            operation: "memory_put".to_string(),
            cause: e.to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|e| Error::OperationFailed {
            operation: "memory_get".to_string(),
            cause: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|e| Error::OperationFailed {
            operation: "memory_keys".to_string(),
            cause: e.to_string(),
        })?;
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
