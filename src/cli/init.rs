//! Init commands - create or adopt a credential store.

use tracing::{debug, info};

use crate::cli::output;
use crate::core::cipher::Age;
use crate::core::sync::Created;
use crate::core::vault::Vault;
use crate::error::Result;

/// Clone `url` into a dedicated store under the current directory.
pub fn execute(url: &str, cipher: Age) -> Result<()> {
    let base = std::env::current_dir()?;
    info!(url = %url, "initializing dedicated store");

    let init = Vault::init(&base, url, cipher)?;
    match init.created {
        Created::Cloned => {
            output::success(&format!("cloned {} into .credmatch-store", url));
        }
        Created::Initialized { reason } => {
            debug!(reason = %reason, "clone failed");
            output::warn(&format!("could not clone {}", url));
            output::success("created an empty store repository pointing at it");
            output::hint("the first stored credential will be pushed there");
        }
    }
    Ok(())
}

/// Use the current git working tree as the store.
pub fn execute_here(cipher: Age) -> Result<()> {
    let base = std::env::current_dir()?;
    info!(dir = %base.display(), "initializing store in current directory");

    let vault = Vault::init_here(&base, cipher)?;
    output::success("initialized credential store in current directory");
    if vault.has_credentials()? {
        output::dimmed("using existing credentials.enc");
    } else {
        output::hint(&format!(
            "add your first credential with {}",
            output::cmd("credmatch store KEY value")
        ));
    }
    Ok(())
}
