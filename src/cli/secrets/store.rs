//! Store command - set a credential and publish the store.

use tracing::info;

use crate::cli::{output, prompt, sync};
use crate::core::cipher::Age;
use crate::core::interrupt::CancellationToken;
use crate::core::validation::{validate_key, validate_value};
use crate::core::vault::Vault;
use crate::error::Result;

/// Store `value` under `key`.
pub fn execute(
    key: &str,
    value: &str,
    password: Option<String>,
    cipher: Age,
    cancel: &CancellationToken,
) -> Result<()> {
    info!(key = %key, "storing credential");

    validate_key(key)?;
    validate_value(key, value)?;

    let vault =
        Vault::open(&std::env::current_dir()?, cipher)?.with_cancellation(cancel.clone());
    sync::report_pull(&vault.pull());

    let first = !vault.has_credentials()?;
    let passphrase = prompt::master_password(password, first, cancel)?;

    let stored = vault.store(key, value, &passphrase)?;
    let verb = if stored.replaced { "updated" } else { "stored" };
    output::success(&format!("{} {}", verb, output::key(key)));
    sync::report_delivery(&stored.published.delivery);

    Ok(())
}
