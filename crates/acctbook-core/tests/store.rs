//! Integration tests for the account store.
//!
//! These drive the public API against both storage backends and check what
//! ends up in the persisted slot.

#![allow(clippy::unwrap_used)]

use acctbook_core::{
    AccountId, AccountStore, AccountType, AccountUpdate, Error, FileStorage, KeyValueStorage,
    MemoryStorage, StorageError, StoreConfig, parse_tags_string,
};

#[test]
fn test_file_store_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let config = StoreConfig::new().with_data_dir(tmp.path());

    let id = {
        let mut store = AccountStore::with_config(config.file_storage(), config.clone()).unwrap();
        let id = store.add_account().unwrap();
        store
            .update_account(
                &id,
                AccountUpdate::new()
                    .account_type(AccountType::Ldap)
                    .login("cn=admin,dc=corp")
                    .password(None)
                    .tags(parse_tags_string("infra; prod")),
            )
            .unwrap();
        assert_eq!(store.refresh_validity(&id).unwrap(), Some(true));
        id
    };

    let store = AccountStore::with_config(config.file_storage(), config).unwrap();
    assert_eq!(store.accounts_count(), 1);
    assert_eq!(store.valid_accounts_count(), 1);
    let account = store.get(&id).unwrap();
    assert_eq!(account.login, "cn=admin,dc=corp");
    assert_eq!(account.account_type, AccountType::Ldap);
    assert!(account.password.is_none());
    assert_eq!(
        AccountStore::<FileStorage>::tags_to_string(&account.tags),
        "infra; prod"
    );
}

#[test]
fn test_persisted_layout() {
    let mut store = AccountStore::new(MemoryStorage::new()).unwrap();
    let id = store.add_account().unwrap();

    let raw = store.storage().get("accounts").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": id.as_str(),
            "tags": [],
            "type": "Локальная",
            "login": "",
            "password": "",
            "isValid": false
        }])
    );
}

#[test]
fn test_reads_records_written_by_browser_build() {
    let json = r#"[
        {"id":"1718000000000k3j9x2a1b","tags":[{"text":"hr"},{"text":"hr"}],"type":"Локальная","login":"ivanov","password":"qwerty","isValid":true},
        {"id":"1718000000001zz8y7w6v5","tags":[],"type":"LDAP","login":"","password":null,"isValid":false}
    ]"#;
    let store = AccountStore::new(MemoryStorage::with_entry("accounts", json)).unwrap();

    assert_eq!(store.accounts_count(), 2);
    assert_eq!(store.valid_accounts_count(), 1);
    let first = store.get(&AccountId::new("1718000000000k3j9x2a1b")).unwrap();
    assert_eq!(first.tags.len(), 2);
}

#[test]
fn test_not_json_loads_empty() {
    let store = AccountStore::new(MemoryStorage::with_entry("accounts", "not json")).unwrap();
    assert_eq!(store.accounts_count(), 0);
    // The corrupt slot is only replaced on the next write
    assert_eq!(
        store.storage().get("accounts").unwrap().as_deref(),
        Some("not json")
    );
}

#[test]
fn test_corrupt_file_loads_empty_then_overwritten() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("accounts.json"), "{\"broken\":").unwrap();

    let mut store = AccountStore::new(FileStorage::new(tmp.path())).unwrap();
    assert_eq!(store.accounts_count(), 0);

    store.add_account().unwrap();
    let raw = std::fs::read_to_string(tmp.path().join("accounts.json")).unwrap();
    assert!(raw.starts_with('['));
}

#[test]
fn test_add_then_remove_counts() {
    let mut store = AccountStore::new(MemoryStorage::new()).unwrap();
    let ids: Vec<_> = (0..5).map(|_| store.add_account().unwrap()).collect();
    assert_eq!(store.accounts_count(), 5);

    assert!(store.remove_account(&ids[2]).unwrap());
    assert_eq!(store.accounts_count(), 4);
    assert!(store.get(&ids[2]).is_none());

    assert!(!store.remove_account(&ids[2]).unwrap());
    assert_eq!(store.accounts_count(), 4);
}

#[test]
fn test_quota_error_surfaces() {
    let mut store = AccountStore::new(MemoryStorage::with_quota(200)).unwrap();
    store.add_account().unwrap();

    let id = store.accounts()[0].id.clone();
    let result = store.update_account(&id, AccountUpdate::new().login("x".repeat(500)));
    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::QuotaExceeded { limit: 200, .. }))
    ));
}

#[test]
fn test_boxed_storage() {
    let storage: Box<dyn KeyValueStorage> = Box::new(MemoryStorage::new());
    let mut store = AccountStore::new(storage).unwrap();
    store.add_account().unwrap();
    assert!(store.storage().get("accounts").unwrap().is_some());
}
