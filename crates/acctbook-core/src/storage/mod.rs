//! Key-value storage backends.
//!
//! The account store mirrors its list into a single string slot. Anything
//! that can get and set strings by key can back it:
//! - [`MemoryStorage`]: in-process map, optionally capacity-limited
//! - [`FileStorage`]: one JSON file per key under a directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Write would exceed the backend's capacity.
    #[error("Storage quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded {
        /// Capacity in bytes.
        limit: usize,
        /// Total size the write would have produced.
        requested: usize,
    },

    /// Key cannot be used with this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Synchronous string slot storage.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects or fails the write.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
