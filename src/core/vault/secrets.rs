//! Credential operations.
//!
//! Each call decrypts the whole ledger; `store` re-encrypts and replaces the
//! file, then commits and pushes it.

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::cipher::Passphrase;
use crate::core::constants;
use crate::core::ledger::Ledger;
use crate::core::sync::{self, Published};
use crate::core::validation::{validate_key, validate_value};
use crate::error::{Result, SecretError};

/// Result of [`Vault::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored {
    /// Whether an existing value was overwritten
    pub replaced: bool,
    pub published: Published,
}

impl Vault {
    /// Set `key` to `value` and publish the store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the key or value is rejected.
    /// Returns `CipherError::DecryptionFailed` if the existing store does not
    /// open with `passphrase`; nothing is written in that case.
    /// Returns `SyncError::Conflict` if the remote moved on; the new value
    /// stays committed locally.
    pub fn store(&self, key: &str, value: &str, passphrase: &Passphrase) -> Result<Stored> {
        validate_key(key)?;
        validate_value(key, value)?;

        let mut ledger = self.load(passphrase)?;
        let replaced = ledger.upsert(key, value);
        debug!(key = %key, replaced, "upserted credential");

        self.save(&ledger, passphrase)?;
        self.cancel.checkpoint()?;

        let message = format!("Update credential {}", key);
        let published = sync::publish(&self.git, constants::ENCRYPTED_FILE, &message)?;
        info!(key = %key, "credential stored");
        // A SIGINT during the push kills git and shows up as a failed push.
        self.cancel.checkpoint()?;

        Ok(Stored {
            replaced,
            published,
        })
    }

    /// Decrypted value of `key`.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::NotFound` if the key is not in the ledger.
    /// Returns `CipherError::DecryptionFailed` on a wrong password.
    pub fn fetch(&self, key: &str, passphrase: &Passphrase) -> Result<Zeroizing<String>> {
        if !self.has_credentials()? {
            return Err(SecretError::NotFound(key.to_string()).into());
        }
        let ledger = self.load(passphrase)?;
        ledger
            .lookup(key)
            .map(|value| Zeroizing::new(value.to_string()))
            .ok_or_else(|| SecretError::NotFound(key.to_string()).into())
    }

    /// All credentials, in ledger order.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` on a wrong password.
    pub fn list(&self, passphrase: &Passphrase) -> Result<Ledger> {
        self.load(passphrase)
    }
}
