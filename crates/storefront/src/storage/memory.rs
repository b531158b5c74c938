//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{KeyValueStore, StorageError, validate_key};

/// A process-local store, optionally limited to a total byte quota.
///
/// The quota counts key and value bytes across all records, the way browser
/// local storage does. A write that would exceed it fails and leaves the
/// previous value in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// An unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once `quota` bytes are in use.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);
        store.set("cart", "value").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("value"));
        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);
        store.set("cart", "abcdef").unwrap();

        let err = store.set("cart", "abcdefg").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        ));
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_quota_counts_other_keys() {
        let store = MemoryStore::with_quota(12);
        store.set("a", "12345").unwrap();
        assert!(store.set("b", "123456").is_err());
        assert!(store.set("b", "12345").is_ok());
    }
}
