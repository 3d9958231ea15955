//! List command - print every credential.

use serde::Serialize;
use zeroize::Zeroizing;

use crate::cli::{output, prompt, sync};
use crate::core::cipher::Age;
use crate::core::interrupt::CancellationToken;
use crate::core::ledger::Ledger;
use crate::core::vault::Vault;
use crate::error::Result;

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    value: &'a str,
}

/// List all credentials as `KEY=VALUE` lines, or as JSON.
pub fn execute(
    password: Option<String>,
    json: bool,
    cipher: Age,
    cancel: &CancellationToken,
) -> Result<()> {
    let vault =
        Vault::open(&std::env::current_dir()?, cipher)?.with_cancellation(cancel.clone());
    sync::report_pull(&vault.pull());

    let ledger = if vault.has_credentials()? {
        let passphrase = prompt::master_password(password, false, cancel)?;
        vault.list(&passphrase)?
    } else {
        Ledger::new()
    };

    if json {
        let entries: Vec<Entry<'_>> = ledger
            .all()
            .map(|(key, value)| Entry { key, value })
            .collect();
        let rendered = Zeroizing::new(serde_json::to_string_pretty(&entries)?);
        println!("{}", rendered.as_str());
        return Ok(());
    }

    if ledger.is_empty() {
        output::dimmed("no credentials stored");
        return Ok(());
    }

    for (key, value) in ledger.all() {
        println!("{}={}", key, value);
    }
    Ok(())
}
