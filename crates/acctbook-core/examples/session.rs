//! Example: a short editing session against the on-disk account list.
//!
//! Adds an LDAP account and a local one, validates both the way an edit
//! form would, and prints the resulting counts. Data lands in the platform
//! data directory unless `ACCTBOOK_DIR` points elsewhere.
//!
//! ```bash
//! RUST_LOG=acctbook_core=debug cargo run --package acctbook-core --example session
//! ```

use acctbook_core::{
    AccountStore, AccountType, AccountUpdate, StoreConfig, parse_tags_string, validate_account,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "acctbook_core=debug,session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = StoreConfig::new();
    if let Ok(dir) = std::env::var("ACCTBOOK_DIR") {
        config = config.with_data_dir(dir);
    }
    info!("Using data directory {:?}", config.data_dir);

    let mut store = AccountStore::with_config(config.file_storage(), config)?;
    store.subscribe(|event| info!("Store event: {event:?}"));

    let ldap = store.add_account()?;
    store.update_account(
        &ldap,
        AccountUpdate::new()
            .account_type(AccountType::Ldap)
            .login("cn=operator,dc=example")
            .password(None)
            .tags(parse_tags_string("ops; directory")),
    )?;
    store.refresh_validity(&ldap)?;

    let local = store.add_account()?;
    store.update_account(&local, AccountUpdate::new().login("   "))?;
    store.refresh_validity(&local)?;

    if let Some(account) = store.get(&local)
        && let Err(errors) = validate_account(account)
    {
        for error in errors {
            info!("{}: {}", error.field(), error);
        }
    }

    println!(
        "{} accounts, {} valid",
        store.accounts_count(),
        store.valid_accounts_count()
    );
    Ok(())
}
