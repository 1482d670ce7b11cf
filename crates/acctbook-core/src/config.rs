//! Store configuration.

use std::path::PathBuf;

use crate::storage::FileStorage;
use crate::{Error, Result};

/// Default storage slot holding the account list.
pub const DEFAULT_STORAGE_KEY: &str = "accounts";

/// Directory name under the platform data directory.
const APP_DIR_NAME: &str = "acctbook";

/// Where and under which key the account list is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Slot name the serialized list is written to.
    pub storage_key: String,
    /// Directory used by [`StoreConfig::file_storage`].
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Use a different data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the storage key is blank.
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::Config("storage key must not be empty".to_string()));
        }
        Ok(())
    }

    /// File storage rooted at the configured data directory.
    #[must_use]
    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }
}

/// Platform data directory for the application, or `.` when there is none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, "accounts");
        assert!(config.data_dir.ends_with("acctbook"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = StoreConfig::new()
            .with_storage_key("work-accounts")
            .with_data_dir("/tmp/acctbook-test");
        assert_eq!(config.storage_key, "work-accounts");
        assert_eq!(
            config.file_storage().dir(),
            std::path::Path::new("/tmp/acctbook-test")
        );
    }

    #[test]
    fn test_blank_key_rejected() {
        let config = StoreConfig::new().with_storage_key("  ");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
