//! In-memory storage backend.

use std::collections::HashMap;

use tracing::warn;

use super::{KeyValueStorage, StorageError, StorageResult};

/// `HashMap`-backed storage.
///
/// With a quota set, the combined byte length of all keys and values is
/// capped, like a browser origin's local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates an empty, unlimited storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage capped at `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Creates storage pre-populated with one slot.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.into(), value.into());
        storage
    }

    /// Removes a slot, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Bytes currently used by keys and values.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(limit) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let requested = self.used_bytes() - replaced + key.len() + value.len();
            if requested > limit {
                warn!("Write to {key:?} rejected: {requested} bytes exceeds quota of {limit}");
                return Err(StorageError::QuotaExceeded { limit, requested });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("accounts").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let mut storage = MemoryStorage::new();
        storage.set("accounts", "[]").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("[]"));
        storage.set("accounts", "[1]").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_with_entry_and_remove() {
        let mut storage = MemoryStorage::with_entry("k", "v");
        assert_eq!(storage.remove("k").as_deref(), Some("v"));
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        // "key" + 7 bytes = 10
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("key", "1234567").unwrap();
        storage.set("key", "7654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }

    #[test]
    fn test_quota_exceeded() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set("key", "1234567").unwrap();
        let err = storage.set("key", "12345678").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                limit: 10,
                requested: 11
            }
        ));
        // Old value stays
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("1234567"));
    }
}
