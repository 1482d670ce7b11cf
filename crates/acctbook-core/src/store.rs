//! The account list and its persistence.

use tracing::{debug, error};

use crate::account::{
    self, Account, AccountId, AccountUpdate, TagItem, is_valid_account,
};
use crate::config::StoreConfig;
use crate::storage::KeyValueStorage;
use crate::Result;

/// Change delivered to store listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The list was (re)read from storage.
    Loaded,
    /// An account was appended.
    Added(AccountId),
    /// An account was removed.
    Removed(AccountId),
    /// An account's fields were overwritten.
    Updated(AccountId),
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Owns the account list and mirrors it into a storage slot.
///
/// The in-memory list is authoritative. Every mutation rewrites the whole
/// slot. If that write fails the error is returned, but the in-memory
/// change is kept and no event is delivered.
pub struct AccountStore<S: KeyValueStorage> {
    accounts: Vec<Account>,
    storage: S,
    config: StoreConfig,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStorage> AccountStore<S> {
    /// Create a store with the default configuration and hydrate it from
    /// `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage slot cannot be read.
    pub fn new(storage: S) -> Result<Self> {
        Self::with_config(storage, StoreConfig::default())
    }

    /// Create a store with an explicit configuration and hydrate it from
    /// `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the storage slot
    /// cannot be read.
    pub fn with_config(storage: S, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let mut store = Self {
            accounts: Vec::new(),
            storage,
            config,
            listeners: Vec::new(),
        };
        store.load_accounts()?;
        Ok(store)
    }

    /// Replace the in-memory list with the stored one.
    ///
    /// An absent or empty slot leaves the list untouched. A slot that does
    /// not parse as an account list is logged and the list is reset to
    /// empty; that case is not reported as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails to read.
    pub fn load_accounts(&mut self) -> Result<()> {
        let key = self.config.storage_key.as_str();
        match self.storage.get(key)? {
            Some(raw) if !raw.is_empty() => match serde_json::from_str::<Vec<Account>>(&raw) {
                Ok(accounts) => {
                    debug!("Loaded {} accounts from {key:?}", accounts.len());
                    self.accounts = accounts;
                }
                Err(e) => {
                    error!("Error loading accounts from {key:?}: {e}");
                    self.accounts.clear();
                }
            },
            _ => debug!("No stored accounts under {key:?}"),
        }
        self.notify(&StoreEvent::Loaded);
        Ok(())
    }

    /// Serialize the whole list and overwrite the storage slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save_accounts(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.accounts)?;
        self.storage.set(&self.config.storage_key, &json)?;
        debug!(
            "Saved {} accounts to {:?}",
            self.accounts.len(),
            self.config.storage_key
        );
        Ok(())
    }

    /// Build a fresh, unsaved local account.
    #[must_use]
    pub fn create_account() -> Account {
        Account::new()
    }

    /// Append a fresh account and persist. Returns the new account's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn add_account(&mut self) -> Result<AccountId> {
        let account = Self::create_account();
        let id = account.id.clone();
        self.accounts.push(account);
        self.save_accounts()?;
        debug!("Added account {id}");
        self.notify(&StoreEvent::Added(id.clone()));
        Ok(id)
    }

    /// Remove the account with `id` and persist.
    ///
    /// Returns `false` without writing anything if no account matches.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn remove_account(&mut self, id: &AccountId) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        self.accounts.remove(index);
        self.save_accounts()?;
        debug!("Removed account {id}");
        self.notify(&StoreEvent::Removed(id.clone()));
        Ok(true)
    }

    /// Merge `updates` onto the account with `id` and persist.
    ///
    /// Returns `false` without writing anything if no account matches.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn update_account(&mut self, id: &AccountId, updates: AccountUpdate) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        updates.apply(&mut self.accounts[index]);
        self.save_accounts()?;
        debug!("Updated account {id}");
        self.notify(&StoreEvent::Updated(id.clone()));
        Ok(true)
    }

    /// Run validation on the stored account and record the verdict in its
    /// `is_valid` flag.
    ///
    /// Returns `None` if no account matches.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails.
    pub fn refresh_validity(&mut self, id: &AccountId) -> Result<Option<bool>> {
        let Some(valid) = self.get(id).map(is_valid_account) else {
            return Ok(None);
        };
        self.update_account(id, AccountUpdate::new().is_valid(valid))?;
        Ok(Some(valid))
    }

    /// Whether `account` passes every validation rule.
    ///
    /// Pure; the account's cached flag is left alone.
    #[must_use]
    pub fn validate_account(account: &Account) -> bool {
        is_valid_account(account)
    }

    /// See [`account::parse_tags_string`].
    #[must_use]
    pub fn parse_tags_string(tags: &str) -> Vec<TagItem> {
        account::parse_tags_string(tags)
    }

    /// See [`account::tags_to_string`].
    #[must_use]
    pub fn tags_to_string(tags: &[TagItem]) -> String {
        account::tags_to_string(tags)
    }

    /// All accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Look up an account by ID.
    #[must_use]
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == *id)
    }

    /// Number of accounts.
    #[must_use]
    pub fn accounts_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of accounts whose cached flag says valid.
    ///
    /// Does not re-run validation.
    #[must_use]
    pub fn valid_accounts_count(&self) -> usize {
        self.accounts.iter().filter(|account| account.is_valid).count()
    }

    /// Register a callback for every load and successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, handing back its storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, id: &AccountId) -> Option<usize> {
        self.accounts.iter().position(|account| account.id == *id)
    }

    fn notify(&mut self, event: &StoreEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl<S: KeyValueStorage + std::fmt::Debug> std::fmt::Debug for AccountStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStore")
            .field("accounts", &self.accounts)
            .field("storage", &self.storage)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::account::AccountType;
    use crate::storage::{MemoryStorage, StorageError};
    use crate::Error;

    fn empty_store() -> AccountStore<MemoryStorage> {
        AccountStore::new(MemoryStorage::new()).unwrap()
    }

    fn stored(store: &AccountStore<MemoryStorage>) -> Vec<Account> {
        let raw = store.storage().get("accounts").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    mod load_tests {
        use super::*;

        #[test]
        fn starts_empty_without_slot() {
            let store = empty_store();
            assert_eq!(store.accounts_count(), 0);
            assert_eq!(store.storage().get("accounts").unwrap(), None);
        }

        #[test]
        fn hydrates_from_slot() {
            let json = r#"[{"id":"1","tags":[{"text":"ops"}],"type":"LDAP","login":"cn=ops","password":null,"isValid":true}]"#;
            let store = AccountStore::new(MemoryStorage::with_entry("accounts", json)).unwrap();
            assert_eq!(store.accounts_count(), 1);
            let account = store.get(&AccountId::new("1")).unwrap();
            assert_eq!(account.account_type, AccountType::Ldap);
            assert_eq!(account.tags, vec![TagItem::new("ops")]);
            assert!(account.password.is_none());
        }

        #[test]
        fn corrupt_slot_resets_to_empty() {
            let mut store = empty_store();
            store.add_account().unwrap();
            store.storage.set("accounts", "not json").unwrap();

            store.load_accounts().unwrap();
            assert_eq!(store.accounts_count(), 0);
        }

        #[test]
        fn wrong_shape_resets_to_empty() {
            for raw in ["{}", "null", "[1,2]", r#"[{"id":"1"}]"#] {
                let store = AccountStore::new(MemoryStorage::with_entry("accounts", raw)).unwrap();
                assert_eq!(store.accounts_count(), 0, "{raw}");
            }
        }

        #[test]
        fn absent_slot_keeps_memory() {
            let mut store = empty_store();
            store.add_account().unwrap();
            store.storage.remove("accounts");

            store.load_accounts().unwrap();
            assert_eq!(store.accounts_count(), 1);
        }

        #[test]
        fn empty_string_slot_keeps_memory() {
            let mut store = empty_store();
            store.add_account().unwrap();
            store.storage.set("accounts", "").unwrap();

            store.load_accounts().unwrap();
            assert_eq!(store.accounts_count(), 1);
        }

        #[test]
        fn custom_storage_key() {
            let config = StoreConfig::new().with_storage_key("team");
            let mut store = AccountStore::with_config(MemoryStorage::new(), config).unwrap();
            store.add_account().unwrap();
            assert!(store.storage().get("team").unwrap().is_some());
            assert!(store.storage().get("accounts").unwrap().is_none());
        }

        #[test]
        fn blank_storage_key_rejected() {
            let config = StoreConfig::new().with_storage_key("");
            let result = AccountStore::with_config(MemoryStorage::new(), config);
            assert!(matches!(result, Err(Error::Config(_))));
        }
    }

    mod mutation_tests {
        use super::*;

        #[test]
        fn add_appends_default_account() {
            let mut store = empty_store();
            let first = store.add_account().unwrap();
            let second = store.add_account().unwrap();

            assert_ne!(first, second);
            assert_eq!(store.accounts_count(), 2);
            assert_eq!(store.accounts()[1].id, second);

            let account = store.get(&second).unwrap();
            assert_eq!(account.account_type, AccountType::Local);
            assert!(account.tags.is_empty());
            assert!(account.login.is_empty());
            assert_eq!(account.password.as_deref(), Some(""));
            assert!(!account.is_valid);
        }

        #[test]
        fn every_mutation_mirrors_storage() {
            let mut store = empty_store();
            let a = store.add_account().unwrap();
            assert_eq!(stored(&store), store.accounts());
            let b = store.add_account().unwrap();
            store
                .update_account(&a, AccountUpdate::new().login("alice"))
                .unwrap();
            assert_eq!(stored(&store), store.accounts());
            store.remove_account(&b).unwrap();
            assert_eq!(stored(&store), store.accounts());
        }

        #[test]
        fn remove_keeps_order() {
            let mut store = empty_store();
            let ids: Vec<_> = (0..3).map(|_| store.add_account().unwrap()).collect();

            assert!(store.remove_account(&ids[1]).unwrap());
            let remaining: Vec<_> = store.accounts().iter().map(|a| a.id.clone()).collect();
            assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);
        }

        #[test]
        fn remove_unknown_is_noop() {
            let mut store = empty_store();
            store.add_account().unwrap();
            let before = store.storage().clone();

            assert!(!store.remove_account(&AccountId::new("missing")).unwrap());
            assert_eq!(store.accounts_count(), 1);
            assert_eq!(
                store.storage().get("accounts").unwrap(),
                before.get("accounts").unwrap()
            );
        }

        #[test]
        fn update_is_shallow_merge() {
            let mut store = empty_store();
            let id = store.add_account().unwrap();
            store
                .update_account(
                    &id,
                    AccountUpdate::new()
                        .tags(vec![TagItem::new("a"), TagItem::new("b")])
                        .password(Some("pw".to_string())),
                )
                .unwrap();
            let before = store.get(&id).unwrap().clone();

            store
                .update_account(&id, AccountUpdate::new().login("x"))
                .unwrap();
            let after = store.get(&id).unwrap();
            assert_eq!(after.login, "x");
            assert_eq!(after.tags, before.tags);
            assert_eq!(after.password, before.password);
            assert_eq!(after.account_type, before.account_type);
            assert_eq!(after.is_valid, before.is_valid);
        }

        #[test]
        fn update_unknown_is_noop() {
            let mut store = empty_store();
            assert!(
                !store
                    .update_account(&AccountId::new("missing"), AccountUpdate::new().login("x"))
                    .unwrap()
            );
            // Nothing was ever written
            assert_eq!(store.storage().get("accounts").unwrap(), None);
        }

        #[test]
        fn write_failure_propagates() {
            let mut store = AccountStore::new(MemoryStorage::with_quota(16)).unwrap();
            let result = store.add_account();
            assert!(matches!(
                result,
                Err(Error::Storage(StorageError::QuotaExceeded { .. }))
            ));
            // In-memory append already happened
            assert_eq!(store.accounts_count(), 1);
        }
    }

    mod validity_tests {
        use super::*;

        #[test]
        fn valid_count_reads_cached_flags() {
            let mut store = empty_store();
            let a = store.add_account().unwrap();
            store.add_account().unwrap();

            // Flag set on an account that would fail validation
            store
                .update_account(&a, AccountUpdate::new().is_valid(true))
                .unwrap();
            assert_eq!(store.valid_accounts_count(), 1);
            assert!(!AccountStore::<MemoryStorage>::validate_account(
                store.get(&a).unwrap()
            ));
        }

        #[test]
        fn refresh_validity_records_verdict() {
            let mut store = empty_store();
            let id = store.add_account().unwrap();
            assert_eq!(store.refresh_validity(&id).unwrap(), Some(false));

            store
                .update_account(
                    &id,
                    AccountUpdate::new()
                        .login("admin")
                        .password(Some("secret".to_string())),
                )
                .unwrap();
            // Editing does not revalidate
            assert!(!store.get(&id).unwrap().is_valid);

            assert_eq!(store.refresh_validity(&id).unwrap(), Some(true));
            assert!(store.get(&id).unwrap().is_valid);
            assert_eq!(store.valid_accounts_count(), 1);
        }

        #[test]
        fn refresh_validity_unknown_id() {
            let mut store = empty_store();
            assert_eq!(
                store.refresh_validity(&AccountId::new("missing")).unwrap(),
                None
            );
        }
    }

    mod listener_tests {
        use super::*;

        #[test]
        fn events_in_mutation_order() {
            let events = Rc::new(RefCell::new(Vec::new()));
            let mut store = empty_store();
            let sink = Rc::clone(&events);
            store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

            let id = store.add_account().unwrap();
            store
                .update_account(&id, AccountUpdate::new().login("x"))
                .unwrap();
            store.remove_account(&AccountId::new("missing")).unwrap();
            store.remove_account(&id).unwrap();
            store.load_accounts().unwrap();

            assert_eq!(
                *events.borrow(),
                vec![
                    StoreEvent::Added(id.clone()),
                    StoreEvent::Updated(id.clone()),
                    StoreEvent::Removed(id),
                    StoreEvent::Loaded,
                ]
            );
        }

        #[test]
        fn failed_write_is_not_announced() {
            let events = Rc::new(RefCell::new(Vec::new()));
            let mut store = AccountStore::new(MemoryStorage::with_quota(16)).unwrap();
            let sink = Rc::clone(&events);
            store.subscribe(move |event| sink.borrow_mut().push(event.clone()));

            assert!(store.add_account().is_err());
            assert!(events.borrow().is_empty());
        }
    }

    #[test]
    fn tag_helpers_delegate() {
        let tags = AccountStore::<MemoryStorage>::parse_tags_string("a; b ;c");
        assert_eq!(
            AccountStore::<MemoryStorage>::tags_to_string(&tags),
            "a; b; c"
        );
    }

    #[test]
    fn create_account_is_pure() {
        let store = empty_store();
        let account = AccountStore::<MemoryStorage>::create_account();
        assert_eq!(store.accounts_count(), 0);
        assert!(store.get(&account.id).is_none());
    }
}
