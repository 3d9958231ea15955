//! Store backend.
//!
//! Resolves where the encrypted ledger lives and reads/writes it.
//!
//! A store is either a dedicated subdirectory holding its own git clone
//! ([`StoreMode::Dedicated`]) or the caller's working tree itself
//! ([`StoreMode::CurrentDirectory`]).
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::error::{Result, StoreError};

mod fs;

pub use fs::{write_atomic, Filesystem};

/// Where a store keeps its working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreMode {
    /// A dedicated subdirectory cloned from the credential repository.
    Dedicated,
    /// The current directory, which must already be a git working tree.
    CurrentDirectory,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMode::Dedicated => write!(f, "dedicated"),
            StoreMode::CurrentDirectory => write!(f, "current-directory"),
        }
    }
}

/// Relative path of the store working tree for a mode.
pub fn resolve_location(mode: StoreMode) -> &'static Path {
    match mode {
        StoreMode::Dedicated => Path::new(constants::STORE_DIR),
        StoreMode::CurrentDirectory => Path::new("."),
    }
}

/// A resolved store location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    mode: StoreMode,
    dir: PathBuf,
}

impl Location {
    /// Resolve the store directory for `mode` under `base`.
    pub fn resolve(base: &Path, mode: StoreMode) -> Self {
        let dir = match mode {
            StoreMode::Dedicated => base.join(resolve_location(mode)),
            StoreMode::CurrentDirectory => base.to_path_buf(),
        };
        Self { mode, dir }
    }

    /// Store mode.
    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Working tree directory (where git runs).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the encrypted ledger file.
    pub fn file(&self) -> PathBuf {
        self.dir.join(constants::ENCRYPTED_FILE)
    }

    /// Check the location is usable.
    ///
    /// Dedicated mode needs its directory; current-directory mode needs git
    /// metadata in the directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` otherwise.
    pub fn ensure_initialized(&self) -> Result<()> {
        let ready = match self.mode {
            StoreMode::Dedicated => self.dir.is_dir(),
            StoreMode::CurrentDirectory => self.dir.join(constants::GIT_DIR).exists(),
        };
        debug!(mode = %self.mode, dir = %self.dir.display(), ready, "checking store");
        if ready {
            Ok(())
        } else {
            Err(StoreError::NotInitialized.into())
        }
    }
}

/// Guess the mode of a store without a marker file.
///
/// A dedicated directory wins; otherwise a git working tree that already
/// holds an encrypted ledger is taken as current-directory mode.
pub fn detect_mode(base: &Path) -> Option<StoreMode> {
    if base.join(constants::STORE_DIR).is_dir() {
        return Some(StoreMode::Dedicated);
    }
    if base.join(constants::GIT_DIR).exists() && base.join(constants::ENCRYPTED_FILE).is_file() {
        return Some(StoreMode::CurrentDirectory);
    }
    None
}

/// Encrypted file storage.
pub trait Store {
    /// Read the encrypted ledger.
    ///
    /// # Returns
    ///
    /// `None` if no credentials have been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadFailed` if the file exists but cannot be read.
    fn read_encrypted(&self, location: &Location) -> Result<Option<String>>;

    /// Replace the encrypted ledger in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed`; the previous file is left intact.
    fn write_encrypted(&self, location: &Location, contents: &str) -> Result<()>;
}
