//! Account management module.
//!
//! Provides the account record, tag helpers, and validation.

mod model;
mod tags;
mod text;
mod validation;

pub use model::{Account, AccountId, AccountType, AccountUpdate, TagItem};
pub use tags::{TAG_JOIN_SEPARATOR, parse_tags_string, tags_to_string};
pub use validation::{
    MAX_LOGIN_LEN, MAX_PASSWORD_LEN, MAX_TAG_LEN, ValidationError, ValidationResult,
    is_valid_account, validate_account,
};
