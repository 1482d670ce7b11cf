//! Account validation.

use super::model::Account;
use super::text::{trim_form, utf16_len};

/// Maximum login length, in UTF-16 code units.
pub const MAX_LOGIN_LEN: usize = 100;

/// Maximum password length, in UTF-16 code units.
pub const MAX_PASSWORD_LEN: usize = 100;

/// Maximum tag length, in UTF-16 code units.
pub const MAX_TAG_LEN: usize = 50;

/// Validation error for an account record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Login is empty or whitespace.
    EmptyLogin,
    /// Login is longer than [`MAX_LOGIN_LEN`].
    LoginTooLong,
    /// Password is absent on an account type that needs one.
    MissingPassword,
    /// Password is empty or whitespace on an account type that needs one.
    EmptyPassword,
    /// Password is longer than [`MAX_PASSWORD_LEN`].
    PasswordTooLong,
    /// At least one tag is longer than [`MAX_TAG_LEN`].
    TagTooLong,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyLogin => "Login is required",
            Self::LoginTooLong => "Login must be at most 100 characters",
            Self::MissingPassword | Self::EmptyPassword => "Password is required",
            Self::PasswordTooLong => "Password must be at most 100 characters",
            Self::TagTooLong => "Each tag must be at most 50 characters",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyLogin | Self::LoginTooLong => "login",
            Self::MissingPassword | Self::EmptyPassword | Self::PasswordTooLong => "password",
            Self::TagTooLong => "tags",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating an account.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate an account record.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
/// Does not touch the account's cached `is_valid` flag.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_account(account: &Account) -> ValidationResult {
    let mut errors = Vec::new();

    // Lengths are checked on the raw value, emptiness on the trimmed one
    if trim_form(&account.login).is_empty() {
        errors.push(ValidationError::EmptyLogin);
    }
    if utf16_len(&account.login) > MAX_LOGIN_LEN {
        errors.push(ValidationError::LoginTooLong);
    }

    if account.account_type.requires_password() {
        match account.password.as_deref() {
            None => errors.push(ValidationError::MissingPassword),
            Some(password) => {
                if trim_form(password).is_empty() {
                    errors.push(ValidationError::EmptyPassword);
                }
                if utf16_len(password) > MAX_PASSWORD_LEN {
                    errors.push(ValidationError::PasswordTooLong);
                }
            }
        }
    }

    if account
        .tags
        .iter()
        .any(|tag| utf16_len(&tag.text) > MAX_TAG_LEN)
    {
        errors.push(ValidationError::TagTooLong);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Whether the account passes every validation rule.
#[must_use]
pub fn is_valid_account(account: &Account) -> bool {
    validate_account(account).is_ok()
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
    use crate::account::{AccountType, TagItem};

    fn local(login: &str, password: Option<&str>) -> Account {
        Account {
            login: login.to_string(),
            password: password.map(str::to_string),
            ..Account::new()
        }
    }

    fn ldap(login: &str) -> Account {
        Account {
            account_type: AccountType::Ldap,
            login: login.to_string(),
            password: None,
            ..Account::new()
        }
    }

    #[test]
    fn test_validate_empty_account() {
        let errors = validate_account(&Account::new()).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyLogin));
        assert!(errors.contains(&ValidationError::EmptyPassword));
    }

    #[test]
    fn test_validate_complete_local_account() {
        assert!(validate_account(&local("admin", Some("secret"))).is_ok());
    }

    #[test]
    fn test_whitespace_login_is_empty() {
        let errors = validate_account(&local("   ", Some("secret"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyLogin]);
    }

    #[test]
    fn test_login_length_boundary() {
        assert!(is_valid_account(&local(&"a".repeat(100), Some("pw"))));
        let errors = validate_account(&local(&"a".repeat(101), Some("pw"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::LoginTooLong]);
    }

    #[test]
    fn test_length_counts_utf16_units_not_bytes() {
        // 100 Cyrillic letters are 200 bytes but 100 units
        assert!(is_valid_account(&local(&"ж".repeat(100), Some("пароль"))));
    }

    #[test]
    fn test_astral_login_counts_surrogate_pairs() {
        // 60 emoji are 120 UTF-16 units
        let errors = validate_account(&local(&"😀".repeat(60), Some("pw"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::LoginTooLong]);
        assert!(is_valid_account(&local(&"😀".repeat(50), Some("pw"))));
    }

    #[test]
    fn test_astral_password_counts_surrogate_pairs() {
        let errors = validate_account(&local("admin", Some(&"😀".repeat(51)))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::PasswordTooLong]);
    }

    #[test]
    fn test_astral_tag_counts_surrogate_pairs() {
        let mut account = local("admin", Some("secret"));
        account.tags = vec![TagItem::new("😀".repeat(25))];
        assert!(is_valid_account(&account));

        account.tags = vec![TagItem::new("😀".repeat(30))];
        let errors = validate_account(&account).unwrap_err();
        assert_eq!(errors, vec![ValidationError::TagTooLong]);
    }

    #[test]
    fn test_bom_only_login_is_empty() {
        let errors = validate_account(&local("\u{FEFF}", Some("pw"))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyLogin]);
    }

    #[test]
    fn test_bom_only_password_is_empty() {
        let errors = validate_account(&local("admin", Some("\u{FEFF} "))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyPassword]);
    }

    #[test]
    fn test_login_length_includes_surrounding_whitespace() {
        let login = format!(" {} ", "a".repeat(99));
        assert!(!is_valid_account(&local(&login, Some("pw"))));
    }

    #[test]
    fn test_local_requires_password() {
        let errors = validate_account(&local("admin", None)).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingPassword]);

        let errors = validate_account(&local("admin", Some("  "))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyPassword]);
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(is_valid_account(&local("admin", Some(&"p".repeat(100)))));
        let errors = validate_account(&local("admin", Some(&"p".repeat(101)))).unwrap_err();
        assert_eq!(errors, vec![ValidationError::PasswordTooLong]);
    }

    #[test]
    fn test_ldap_ignores_password() {
        assert!(is_valid_account(&ldap("cn=admin")));

        let mut account = ldap("cn=admin");
        account.password = Some("p".repeat(500));
        assert!(is_valid_account(&account));
    }

    #[test]
    fn test_ldap_still_requires_login() {
        assert!(!is_valid_account(&ldap("")));
    }

    #[test]
    fn test_tag_length_boundary() {
        let mut account = local("admin", Some("secret"));
        account.tags = vec![TagItem::new("t".repeat(50))];
        assert!(is_valid_account(&account));

        account.tags.push(TagItem::new("t".repeat(51)));
        let errors = validate_account(&account).unwrap_err();
        assert_eq!(errors, vec![ValidationError::TagTooLong]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut account = local(&"a".repeat(101), None);
        account.tags = vec![TagItem::new("t".repeat(60))];
        let errors = validate_account(&account).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::LoginTooLong,
                ValidationError::MissingPassword,
                ValidationError::TagTooLong,
            ]
        );
    }

    #[test]
    fn test_does_not_touch_cached_flag() {
        let mut account = local("admin", Some("secret"));
        account.is_valid = false;
        assert!(is_valid_account(&account));
        assert!(!account.is_valid);
    }

    #[test]
    fn test_error_fields_and_messages() {
        assert_eq!(ValidationError::EmptyLogin.field(), "login");
        assert_eq!(ValidationError::MissingPassword.field(), "password");
        assert_eq!(ValidationError::TagTooLong.field(), "tags");
        assert_eq!(
            ValidationError::EmptyPassword.to_string(),
            "Password is required"
        );
    }
}
