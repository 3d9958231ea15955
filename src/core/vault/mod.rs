//! The primary interface for credmatch operations.
//!
//! A [`Vault`] binds a resolved store location to the cipher, the file store
//! and git. Commands open one, then call a single operation on it.

mod lifecycle;
mod secrets;
mod status;

pub use lifecycle::Initialized;
pub use secrets::Stored;
pub use status::{StoreStatus, Synced};

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::cipher::{Age, Cipher, Passphrase};
use crate::core::config::Config;
use crate::core::git::Git;
use crate::core::interrupt::CancellationToken;
use crate::core::ledger::Ledger;
use crate::core::store::{self, Filesystem, Location, Store};
use crate::error::{Result, StoreError};

/// An opened credential store.
pub struct Vault {
    base: PathBuf,
    location: Location,
    store: Filesystem,
    cipher: Age,
    git: Git,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("base", &self.base)
            .field("location", &self.location)
            .field("cipher", &self.cipher.name())
            .finish()
    }
}

impl Vault {
    /// Open the store initialized under `base`.
    ///
    /// The mode comes from `.credmatch.toml`; without a marker it is
    /// inferred from what is on disk.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if there is no store under `base`.
    /// Returns `SyncError::GitNotFound` if git is not installed.
    pub fn open(base: &Path, cipher: Age) -> Result<Self> {
        let mode = match Config::load(base)? {
            Some(config) => config.store.mode,
            None => {
                let mode = store::detect_mode(base).ok_or(StoreError::NotInitialized)?;
                debug!(mode = %mode, "no marker, inferred store mode");
                mode
            }
        };

        let location = Location::resolve(base, mode);
        location.ensure_initialized()?;
        let git = Git::locate(location.dir())?;

        Ok(Self::assemble(base, location, cipher, git))
    }

    fn assemble(base: &Path, location: Location, cipher: Age, git: Git) -> Self {
        Self {
            base: base.to_path_buf(),
            location,
            store: Filesystem,
            cipher,
            git,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort at the next checkpoint once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Directory the store was opened from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Resolved store location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Whether the store file holds any ciphertext yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if the file cannot be read.
    pub fn has_credentials(&self) -> Result<bool> {
        Ok(self.store.read_encrypted(&self.location)?.is_some())
    }

    /// Decrypt the current ledger.
    ///
    /// A store without ciphertext yields an empty ledger, whatever the
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` on a wrong password or a
    /// corrupt file.
    pub fn load(&self, passphrase: &Passphrase) -> Result<Ledger> {
        match self.store.read_encrypted(&self.location)? {
            Some(encrypted) => self.decrypt(&encrypted, passphrase),
            None => Ok(Ledger::new()),
        }
    }

    fn decrypt(&self, encrypted: &str, passphrase: &Passphrase) -> Result<Ledger> {
        let plaintext = self.cipher.decrypt(encrypted, passphrase)?;
        Ok(Ledger::parse(&plaintext))
    }

    /// Encrypt `ledger` and replace the store file with it.
    fn save(&self, ledger: &Ledger, passphrase: &Passphrase) -> Result<()> {
        let plaintext = ledger.serialize();
        let encrypted = self.cipher.encrypt(&plaintext, passphrase)?;
        self.cancel.checkpoint()?;
        self.store.write_encrypted(&self.location, &encrypted)?;
        debug!(entries = ledger.len(), "store file written");
        Ok(())
    }
}
