//! Account model types.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Unique identifier for an account.
///
/// Serialized as a bare string. Ids read back from storage are kept as-is,
/// whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    /// Create an account ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered ID (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Borrow the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directory an account authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountType {
    /// LDAP directory account; the password lives in the directory.
    #[serde(rename = "LDAP")]
    Ldap,
    /// Local account with its own password.
    #[default]
    #[serde(rename = "Локальная")]
    Local,
}

impl AccountType {
    /// Get display name for the account type.
    ///
    /// This is also the literal stored in persisted data.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ldap => "LDAP",
            Self::Local => "Локальная",
        }
    }

    /// Whether accounts of this type must carry a password.
    #[must_use]
    pub const fn requires_password(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single label attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagItem {
    /// Tag text.
    pub text: String,
}

impl TagItem {
    /// Creates a new tag.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A login credential set kept in the account list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier, fixed at creation.
    pub id: AccountId,
    /// Tags in display order.
    pub tags: Vec<TagItem>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Login on the remote or local directory.
    pub login: String,
    /// Password; `None` is only acceptable for LDAP accounts.
    pub password: Option<String>,
    /// Last validity verdict assigned by the caller.
    ///
    /// Not recomputed when other fields change.
    pub is_valid: bool,
}

impl Account {
    /// Create a new empty local account with a fresh ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: AccountId::generate(),
            tags: Vec::new(),
            account_type: AccountType::Local,
            login: String::new(),
            password: Some(String::new()),
            is_valid: false,
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new()
    }
}

/// Partial update for an [`Account`].
///
/// Only the fields that are set are written; everything else on the target
/// account stays as it was. `tags` replaces the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<TagItem>>,
    /// Replacement account type.
    #[serde(default, rename = "type")]
    pub account_type: Option<AccountType>,
    /// Replacement login.
    #[serde(default)]
    pub login: Option<String>,
    /// Replacement password; `Some(None)` clears it.
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    /// Replacement validity flag.
    #[serde(default)]
    pub is_valid: Option<bool>,
}

impl AccountUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag list.
    #[must_use]
    pub fn tags(mut self, tags: Vec<TagItem>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Set the account type.
    #[must_use]
    pub const fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    /// Set the login.
    #[must_use]
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// Set or clear the password.
    #[must_use]
    pub fn password(mut self, password: Option<String>) -> Self {
        self.password = Some(password);
        self
    }

    /// Set the cached validity flag.
    #[must_use]
    pub const fn is_valid(mut self, is_valid: bool) -> Self {
        self.is_valid = Some(is_valid);
        self
    }

    /// Whether the update carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tags.is_none()
            && self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
            && self.is_valid.is_none()
    }

    /// Write the provided fields onto `account`.
    pub fn apply(self, account: &mut Account) {
        if let Some(tags) = self.tags {
            account.tags = tags;
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(login) = self.login {
            account.login = login;
        }
        if let Some(password) = self.password {
            account.password = password;
        }
        if let Some(is_valid) = self.is_valid {
            account.is_valid = is_valid;
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
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
    use super::*;

    mod account_id_tests {
        use super::*;

        #[test]
        fn new() {
            let id = AccountId::new("42");
            assert_eq!(id.as_str(), "42");
        }

        #[test]
        fn display() {
            let id = AccountId::new("abc123");
            assert_eq!(format!("{id}"), "abc123");
        }

        #[test]
        fn generate_is_unique() {
            let ids: std::collections::HashSet<_> =
                (0..1000).map(|_| AccountId::generate()).collect();
            assert_eq!(ids.len(), 1000);
        }

        #[test]
        fn serializes_as_plain_string() {
            let id = AccountId::new("1700000000000abc");
            assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000000abc\"");
        }
    }

    mod account_type_tests {
        use super::*;

        #[test]
        fn default_is_local() {
            assert_eq!(AccountType::default(), AccountType::Local);
        }

        #[test]
        fn display_names() {
            assert_eq!(AccountType::Ldap.display_name(), "LDAP");
            assert_eq!(AccountType::Local.display_name(), "Локальная");
        }

        #[test]
        fn serialized_literals() {
            assert_eq!(
                serde_json::to_string(&AccountType::Ldap).unwrap(),
                "\"LDAP\""
            );
            assert_eq!(
                serde_json::to_string(&AccountType::Local).unwrap(),
                "\"Локальная\""
            );
        }

        #[test]
        fn rejects_unknown_literal() {
            assert!(serde_json::from_str::<AccountType>("\"Local\"").is_err());
        }

        #[test]
        fn password_requirement() {
            assert!(!AccountType::Ldap.requires_password());
            assert!(AccountType::Local.requires_password());
        }
    }

    mod account_tests {
        use super::*;

        #[test]
        fn new_creates_empty_local() {
            let account = Account::new();
            assert!(account.tags.is_empty());
            assert_eq!(account.account_type, AccountType::Local);
            assert!(account.login.is_empty());
            assert_eq!(account.password.as_deref(), Some(""));
            assert!(!account.is_valid);
        }

        #[test]
        fn json_field_names() {
            let account = Account {
                id: AccountId::new("1"),
                tags: vec![TagItem::new("dev")],
                account_type: AccountType::Ldap,
                login: "ivan".to_string(),
                password: None,
                is_valid: true,
            };
            let value = serde_json::to_value(&account).unwrap();
            assert_eq!(
                value,
                serde_json::json!({
                    "id": "1",
                    "tags": [{ "text": "dev" }],
                    "type": "LDAP",
                    "login": "ivan",
                    "password": null,
                    "isValid": true
                })
            );
        }

        #[test]
        fn deserializes_stored_record() {
            let json = r#"{"id":"17a","tags":[],"type":"Локальная","login":"root","password":"pw","isValid":false}"#;
            let account: Account = serde_json::from_str(json).unwrap();
            assert_eq!(account.id, AccountId::new("17a"));
            assert_eq!(account.account_type, AccountType::Local);
            assert_eq!(account.password.as_deref(), Some("pw"));
        }
    }

    mod account_update_tests {
        use super::*;

        fn sample() -> Account {
            Account {
                id: AccountId::new("a"),
                tags: vec![TagItem::new("one"), TagItem::new("two")],
                account_type: AccountType::Local,
                login: "user".to_string(),
                password: Some("secret".to_string()),
                is_valid: true,
            }
        }

        #[test]
        fn empty_update_changes_nothing() {
            let mut account = sample();
            let update = AccountUpdate::new();
            assert!(update.is_empty());
            update.apply(&mut account);
            assert_eq!(account, sample());
        }

        #[test]
        fn overwrites_only_given_fields() {
            let mut account = sample();
            AccountUpdate::new().login("x").apply(&mut account);
            assert_eq!(account.login, "x");
            assert_eq!(account.tags, sample().tags);
            assert_eq!(account.password, sample().password);
            assert!(account.is_valid);
        }

        #[test]
        fn falsy_values_are_written() {
            let mut account = sample();
            AccountUpdate::new()
                .login("")
                .password(None)
                .is_valid(false)
                .apply(&mut account);
            assert!(account.login.is_empty());
            assert!(account.password.is_none());
            assert!(!account.is_valid);
        }

        #[test]
        fn tags_are_replaced_wholesale() {
            let mut account = sample();
            AccountUpdate::new()
                .tags(vec![TagItem::new("three")])
                .apply(&mut account);
            assert_eq!(account.tags, vec![TagItem::new("three")]);
        }

        #[test]
        fn deserialize_partial_object() {
            let update: AccountUpdate =
                serde_json::from_str(r#"{"login":"x","type":"LDAP"}"#).unwrap();
            assert_eq!(update.login.as_deref(), Some("x"));
            assert_eq!(update.account_type, Some(AccountType::Ldap));
            assert!(update.password.is_none());
            assert!(update.tags.is_none());
        }

        #[test]
        fn deserialize_null_password_clears_it() {
            let update: AccountUpdate = serde_json::from_str(r#"{"password":null}"#).unwrap();
            assert_eq!(update.password, Some(None));
        }

        #[test]
        fn id_is_not_updatable() {
            let update: AccountUpdate = serde_json::from_str(r#"{"id":"other"}"#).unwrap();
            assert!(update.is_empty());
            let mut account = sample();
            update.apply(&mut account);
            assert_eq!(account.id, AccountId::new("a"));
        }
    }
}
