//! Error types for credmatch.
//!
//! Each concern has its own error enum; [`Error`] wraps them and decides the
//! process exit code. Messages never carry passwords or decrypted values.

use thiserror::Error;

/// Exit code for generic usage and state errors.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for rejected key/value content.
pub const EXIT_VALIDATION: i32 = 3;
/// Exit code for a key absent from the ledger.
pub const EXIT_NOT_FOUND: i32 = 4;
/// Exit code for a lost race against a concurrent remote update.
pub const EXIT_CONFLICT: i32 = 5;
/// Exit code after SIGINT.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("interrupted")]
    Interrupted,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(e) if e.is_content() => EXIT_VALIDATION,
            Error::Secret(SecretError::NotFound(_)) => EXIT_NOT_FOUND,
            Error::Sync(SyncError::Conflict(_)) => EXIT_CONFLICT,
            Error::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }

    /// Follow-up suggestion printed under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Store(StoreError::NotInitialized) => {
                Some("run: credmatch init <repo-url>  (or credmatch init-here)")
            }
            Error::Store(StoreError::NotAGitRepository(_)) => Some("run: git init"),
            Error::Cipher(CipherError::DecryptionFailed(_)) => {
                Some("check the master password and try again")
            }
            Error::Sync(SyncError::Conflict(_)) => {
                Some("run: credmatch sync  (merges and pushes the local change)")
            }
            Error::Sync(SyncError::GitNotFound) => Some("install git and make sure it is on PATH"),
            _ => None,
        }
    }
}

/// Invalid or missing user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("value for '{0}' cannot be empty")]
    EmptyValue(String),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("repository URL cannot be empty")]
    EmptyUrl,

    #[error("master password cannot be empty")]
    EmptyPassword,

    #[error("master password required (no terminal to prompt on)")]
    PasswordRequired,

    #[error("invalid work factor {0}: expected 1-30")]
    InvalidWorkFactor(u8),
}

impl ValidationError {
    /// Whether this rejects the content of a key or value, as opposed to
    /// missing input.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            ValidationError::InvalidKey { .. } | ValidationError::InvalidValue { .. }
        )
    }
}

/// Store location and file errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("credential store not initialized")]
    NotInitialized,

    #[error("credential store already initialized in {0}")]
    AlreadyInitialized(String),

    #[error("{0} is not a git working tree")]
    NotAGitRepository(String),

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Encryption and decryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),
}

/// Credential lookup errors.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("credential not found: {0}")]
    NotFound(String),
}

/// Git synchronization errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("git executable not found")]
    GitNotFound,

    #[error("could not clone or create repository for {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("remote has conflicting changes: {0}")]
    Conflict(String),
}

/// Marker file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read .credmatch.toml: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse .credmatch.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize .credmatch.toml: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid {field} in .credmatch.toml: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
