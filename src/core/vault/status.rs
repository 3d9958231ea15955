//! Synchronization and status.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Vault;
use crate::core::cipher::Passphrase;
use crate::core::constants;
use crate::core::ledger::Ledger;
use crate::core::store::StoreMode;
use crate::core::sync::{self, Delivery, Published, Pull, RepoState};
use crate::error::{Result, SyncError};

/// Result of [`Vault::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synced {
    pub pull: Pull,
    /// Push of pending or merged commits, if one was attempted
    pub delivery: Option<Delivery>,
    /// Whether diverged histories were merged
    pub merged: bool,
}

/// Read-only view of a store, as printed by `status`.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub mode: StoreMode,
    pub dir: PathBuf,
    pub file: PathBuf,
    pub has_credentials: bool,
    #[serde(flatten)]
    pub repo: RepoState,
}

impl Vault {
    /// Bring the store up to the remote state, best effort.
    pub fn pull(&self) -> Pull {
        sync::pull_latest(&self.git)
    }

    /// Pull, then push local commits or merge diverged histories.
    ///
    /// `passphrase` is only called when the histories diverged and the
    /// ledgers have to be decrypted to merge them.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if the local store does not
    /// open with the password. Returns `SyncError::Conflict` if the remote
    /// store does not open with it, or the merged push is rejected again.
    pub fn sync<F>(&self, passphrase: F) -> Result<Synced>
    where
        F: FnOnce() -> Result<Passphrase>,
    {
        let pull = self.pull();
        debug!(pull = ?pull, "pulled");

        let (delivery, merged) = match &pull {
            Pull::Ahead => (Some(self.push_pending()), false),
            Pull::Diverged => {
                let passphrase = passphrase()?;
                self.cancel.checkpoint()?;
                let published = self.reconcile(&passphrase)?;
                (Some(published.delivery), true)
            }
            _ => (None, false),
        };
        self.cancel.checkpoint()?;

        Ok(Synced {
            pull,
            delivery,
            merged,
        })
    }

    fn push_pending(&self) -> Delivery {
        match sync::push_pending(&self.git) {
            Ok(delivery) => delivery,
            Err(e) => {
                warn!("push of pending commits failed");
                Delivery::Failed(e.to_string())
            }
        }
    }

    /// Merge local and remote ledgers into a merge commit and push it.
    fn reconcile(&self, passphrase: &Passphrase) -> Result<Published> {
        let ours = self.load(passphrase)?;
        let versions = sync::remote_versions(&self.git, constants::ENCRYPTED_FILE)?;

        let theirs = match &versions.theirs {
            Some(encrypted) => self.decrypt(encrypted, passphrase).map_err(|_| {
                SyncError::Conflict(
                    "remote store does not open with this master password".to_string(),
                )
            })?,
            None => Ledger::new(),
        };
        let base = versions
            .base
            .as_deref()
            .and_then(|encrypted| self.decrypt(encrypted, passphrase).ok())
            .unwrap_or_default();

        let merged = Ledger::reconcile(&base, &theirs, &ours);
        debug!(
            ours = ours.len(),
            theirs = theirs.len(),
            merged = merged.len(),
            "reconciled ledgers"
        );
        self.cancel.checkpoint()?;

        sync::begin_merge(&self.git, &versions.upstream)?;
        if let Err(e) = self.save(&merged, passphrase) {
            self.git.merge_abort();
            return Err(e);
        }
        let message = format!("Merge credentials from {}", versions.upstream);
        let published = sync::finish_merge(&self.git, constants::ENCRYPTED_FILE, &message)?;
        info!(upstream = %versions.upstream, "merged diverged store");
        Ok(published)
    }

    /// Store and repository state.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Git` if git cannot report the working tree state.
    pub fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            mode: self.location.mode(),
            dir: self.location.dir().to_path_buf(),
            file: self.location.file(),
            has_credentials: self.has_credentials()?,
            repo: sync::status(&self.git)?,
        })
    }
}
