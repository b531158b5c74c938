//! Durable key-value storage for client-side state.
//!
//! The cart is persisted as a single record under a fixed key. Storage is a
//! fast local synchronous call; callers decide whether a failure matters.
//!
//! # Backends
//!
//! - [`FileStore`] - One file per key in a data directory (survives restarts)
//! - [`MemoryStore`] - In-process map with an optional byte quota

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the backend's quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The key contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A durable string-to-string store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape a directory or collide after encoding.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
