//! Cryptographic operations.
//!
//! Encrypts the serialized ledger with a key derived from the master
//! password. The only backend is age's passphrase mode: scrypt key
//! derivation with a per-file random salt, ChaCha20-Poly1305 payload, and
//! ASCII armor so the result is printable and diffs cleanly in git.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use zeroize::Zeroizing;

use crate::error::Result;

mod age;
mod passphrase;

pub use self::age::Age;
pub use passphrase::Passphrase;

/// Password-based cipher.
pub trait Cipher {
    /// Encrypt plaintext with a key derived from `passphrase`.
    ///
    /// # Returns
    ///
    /// Printable ciphertext suitable for committing to git.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &str, passphrase: &Passphrase) -> Result<String>;

    /// Decrypt ciphertext produced by [`Cipher::encrypt`].
    ///
    /// A wrong password, a corrupt file, and a non-UTF-8 payload all fail
    /// here; the plaintext is only returned once authentication succeeded.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if decryption fails.
    fn decrypt(&self, encrypted: &str, passphrase: &Passphrase) -> Result<Zeroizing<String>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
