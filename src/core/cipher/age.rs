//! Age passphrase backend.
//!
//! Uses age's scrypt recipient/identity pair and ASCII armor encoding.

use std::io::{Read, Write};

use tracing::trace;
use zeroize::Zeroizing;

use super::{Cipher, Passphrase};
use crate::error::{CipherError, Result, ValidationError};

/// Highest scrypt work factor (log2 N) accepted from configuration, and the
/// highest one decryption will attempt.
pub const MAX_WORK_FACTOR: u8 = 30;

/// Age-based passphrase cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Age {
    /// scrypt log2(N); `None` lets age calibrate to roughly one second.
    work_factor: Option<u8>,
}

impl Age {
    /// Cipher with age's calibrated work factor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cipher with a fixed scrypt work factor.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidWorkFactor` outside `1..=30`.
    pub fn with_work_factor(log_n: u8) -> Result<Self> {
        if log_n == 0 || log_n > MAX_WORK_FACTOR {
            return Err(ValidationError::InvalidWorkFactor(log_n).into());
        }
        Ok(Self {
            work_factor: Some(log_n),
        })
    }

    /// Configured work factor, if fixed.
    pub fn work_factor(&self) -> Option<u8> {
        self.work_factor
    }
}

impl Cipher for Age {
    fn name(&self) -> &'static str {
        "age-scrypt"
    }

    fn encrypt(&self, plaintext: &str, passphrase: &Passphrase) -> Result<String> {
        trace!(
            plaintext_len = plaintext.len(),
            work_factor = ?self.work_factor,
            "encrypting"
        );

        let mut recipient = age::scrypt::Recipient::new(passphrase.to_secret());
        if let Some(log_n) = self.work_factor {
            recipient.set_work_factor(log_n);
        }

        let encryptor =
            age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext.as_bytes())?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        String::from_utf8(encrypted)
            .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)).into())
    }

    fn decrypt(&self, encrypted: &str, passphrase: &Passphrase) -> Result<Zeroizing<String>> {
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let reader = age::armor::ArmoredReader::new(encrypted.as_bytes());
        let decryptor = age::Decryptor::new(reader).map_err(describe)?;

        if !decryptor.is_scrypt() {
            return Err(CipherError::DecryptionFailed(
                "store is not passphrase-encrypted".to_string(),
            )
            .into());
        }

        // age's own ceiling sits a few steps above its calibrated factor and
        // would refuse stores written with a high `--work-factor` whenever the
        // flag is not repeated.
        let mut identity = age::scrypt::Identity::new(passphrase.to_secret());
        identity.set_max_work_factor(MAX_WORK_FACTOR);

        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn age::Identity))
            .map_err(describe)?;

        let mut decrypted = Zeroizing::new(Vec::new());
        reader
            .read_to_end(&mut decrypted)
            .map_err(|_| CipherError::DecryptionFailed("ciphertext is corrupt".to_string()))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        let text = std::str::from_utf8(&decrypted)
            .map_err(|_| CipherError::DecryptionFailed("plaintext is not UTF-8".to_string()))?;
        Ok(Zeroizing::new(text.to_owned()))
    }
}

/// Map age's decryption errors without echoing any input.
fn describe(e: age::DecryptError) -> CipherError {
    match e {
        age::DecryptError::DecryptionFailed | age::DecryptError::NoMatchingKeys => {
            CipherError::DecryptionFailed("wrong master password or corrupt store".to_string())
        }
        other => CipherError::DecryptionFailed(other.to_string()),
    }
}
