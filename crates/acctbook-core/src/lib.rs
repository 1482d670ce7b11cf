//! # acctbook-core
//!
//! Core logic for the `acctbook` account-list editor.
//!
//! This crate provides:
//! - The account record (LDAP or local login, password, tags, cached validity)
//! - Validation rules for account records
//! - Tag parsing and joining for `;`-separated edit fields
//! - Pluggable key-value storage (in-memory and file-backed)
//! - [`AccountStore`], which owns the list and mirrors it to storage on every change
//!
//! ## Example
//!
//! ```
//! use acctbook_core::{AccountStore, AccountUpdate, MemoryStorage};
//!
//! let mut store = AccountStore::new(MemoryStorage::new())?;
//! let id = store.add_account()?;
//! store.update_account(&id, AccountUpdate::new().login("admin").password(Some("secret".into())))?;
//! store.refresh_validity(&id)?;
//! assert_eq!(store.valid_accounts_count(), 1);
//! # Ok::<(), acctbook_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
pub mod storage;
mod store;

pub use account::{
    Account, AccountId, AccountType, AccountUpdate, TagItem, ValidationError, ValidationResult,
    is_valid_account, parse_tags_string, tags_to_string, validate_account,
};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, StorageResult};
pub use store::{AccountStore, StoreEvent};
