//! Property tests for tag handling, validation, and derived counts.

#![allow(clippy::unwrap_used)]

use acctbook_core::{
    Account, AccountStore, AccountType, AccountUpdate, MemoryStorage, TagItem, is_valid_account,
    parse_tags_string, tags_to_string,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn tag_tokens(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn form_trim(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace()))
}

fn units(s: &str) -> usize {
    s.encode_utf16().count()
}

fn account_strategy() -> impl Strategy<Value = Account> {
    (
        prop_oneof![Just(AccountType::Ldap), Just(AccountType::Local)],
        "[ a-zа-я😀\u{FEFF}]{0,110}",
        proptest::option::of("[ a-z0-9😀\u{FEFF}]{0,110}"),
        proptest::collection::vec("[a-z😀]{0,60}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(account_type, login, password, tags, is_valid)| Account {
            account_type,
            login,
            password,
            tags: tags.into_iter().map(TagItem::new).collect(),
            is_valid,
            ..Account::new()
        })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn joined_tags_keep_tokens_in_order(input in "[a-z ;]{0,40}") {
        let joined = tags_to_string(&parse_tags_string(&input));
        prop_assert_eq!(joined, tag_tokens(&input).join("; "));
    }

    #[test]
    fn parsed_tags_are_trimmed_and_non_empty(input in "[a-z \t;]{0,40}") {
        for tag in parse_tags_string(&input) {
            prop_assert!(!tag.text.is_empty());
            prop_assert_eq!(tag.text.trim(), tag.text.as_str());
        }
    }

    #[test]
    fn reparsing_joined_tags_is_stable(input in "[a-z ;]{0,40}") {
        let once = parse_tags_string(&input);
        let twice = parse_tags_string(&tags_to_string(&once));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn validity_matches_rules(account in account_strategy()) {
        let login_ok = !form_trim(&account.login).is_empty() && units(&account.login) <= 100;
        let password_ok = account.account_type == AccountType::Ldap
            || account
                .password
                .as_deref()
                .is_some_and(|p| !form_trim(p).is_empty() && units(p) <= 100);
        let tags_ok = account.tags.iter().all(|t| units(&t.text) <= 50);

        prop_assert_eq!(is_valid_account(&account), login_ok && password_ok && tags_ok);
    }

    #[test]
    fn valid_count_tracks_cached_flags(flags in proptest::collection::vec(any::<bool>(), 0..12)) {
        let mut store = AccountStore::new(MemoryStorage::new()).unwrap();
        for flag in &flags {
            let id = store.add_account().unwrap();
            store.update_account(&id, AccountUpdate::new().is_valid(*flag)).unwrap();
        }
        prop_assert_eq!(store.accounts_count(), flags.len());
        prop_assert_eq!(store.valid_accounts_count(), flags.iter().filter(|f| **f).count());
    }
}
