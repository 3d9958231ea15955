//! Sync command, plus the pull/push reporting shared by other commands.

use tracing::{debug, info};

use crate::cli::{output, prompt};
use crate::core::cipher::Age;
use crate::core::interrupt::CancellationToken;
use crate::core::sync::{Delivery, Pull};
use crate::core::vault::Vault;
use crate::error::Result;

/// Pull remote changes, then push or merge local ones.
pub fn execute(password: Option<String>, cipher: Age, cancel: &CancellationToken) -> Result<()> {
    info!("running sync");

    let vault =
        Vault::open(&std::env::current_dir()?, cipher)?.with_cancellation(cancel.clone());
    let synced = vault.sync(|| prompt::master_password(password, false, cancel))?;

    match &synced.pull {
        Pull::NoRemote => output::dimmed("no remote configured, nothing to sync"),
        Pull::UpToDate => output::success("already up to date"),
        Pull::Updated => output::success("pulled latest credentials"),
        Pull::Ahead => {}
        Pull::Diverged => output::success("merged remote and local credentials"),
        Pull::Failed(reason) => {
            debug!(reason = %reason, "pull failed");
            output::warn("could not reach remote, local store unchanged");
        }
    }

    match &synced.delivery {
        Some(Delivery::Pushed) => output::success("pushed local changes"),
        Some(delivery) => report_delivery(delivery),
        None => {}
    }
    Ok(())
}

/// Warn about a pull that did not bring the store up to date.
pub fn report_pull(pull: &Pull) {
    match pull {
        Pull::Failed(reason) => {
            debug!(reason = %reason, "pull failed");
            output::warn("could not update from remote, using local copy");
        }
        Pull::Diverged => {
            output::warn("local store has diverged from the remote");
            output::hint(&format!("run: {}", output::cmd("credmatch sync")));
        }
        Pull::Updated => debug!("store updated from remote"),
        Pull::NoRemote | Pull::UpToDate | Pull::Ahead => {}
    }
}

/// Warn about a push that did not reach the remote.
pub fn report_delivery(delivery: &Delivery) {
    match delivery {
        Delivery::Failed(reason) => {
            debug!(reason = %reason, "push failed");
            output::warn("could not push, change committed locally");
            output::hint(&format!("run: {}", output::cmd("credmatch sync")));
        }
        Delivery::NoRemote => debug!("no remote, change committed locally"),
        Delivery::Pushed => {}
    }
}
