//! Fetch command - print one credential value.

use tracing::info;

use crate::cli::{prompt, sync};
use crate::core::cipher::Age;
use crate::core::interrupt::CancellationToken;
use crate::core::vault::Vault;
use crate::error::{Result, SecretError};

/// Print the value of `key` to stdout, and nothing else.
pub fn execute(
    key: &str,
    password: Option<String>,
    cipher: Age,
    cancel: &CancellationToken,
) -> Result<()> {
    info!(key = %key, "fetching credential");

    let vault =
        Vault::open(&std::env::current_dir()?, cipher)?.with_cancellation(cancel.clone());
    sync::report_pull(&vault.pull());

    if !vault.has_credentials()? {
        return Err(SecretError::NotFound(key.to_string()).into());
    }

    let passphrase = prompt::master_password(password, false, cancel)?;

    let value = vault.fetch(key, &passphrase)?;
    println!("{}", value.as_str());
    Ok(())
}
