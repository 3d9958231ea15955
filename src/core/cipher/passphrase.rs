//! Master password container.

use age::secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, ValidationError};

/// The master password.
///
/// Backed by a `SecretString`, so the bytes are zeroized when it is dropped,
/// whichever path the command exits through.
pub struct Passphrase(SecretString);

impl Passphrase {
    /// Wrap a password, rejecting the empty string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyPassword` if `password` is empty.
    pub fn new(password: String) -> Result<Self> {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }
        Ok(Self(SecretString::from(password)))
    }

    /// Fresh `SecretString` copy for handing to age, which takes ownership.
    pub(crate) fn to_secret(&self) -> SecretString {
        SecretString::from(self.0.expose_secret().to_owned())
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(***)")
    }
}
