//! Store initialization.

use std::path::Path;

use tracing::{debug, info};

use super::Vault;
use crate::core::cipher::Age;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::git::Git;
use crate::core::store::{Location, StoreMode};
use crate::core::sync::{self, Created};
use crate::core::validation::validate_url;
use crate::error::{Result, StoreError};

/// Result of [`Vault::init`].
#[derive(Debug)]
pub struct Initialized {
    pub vault: Vault,
    /// Whether the repository was cloned or created empty
    pub created: Created,
}

impl Vault {
    /// Create a dedicated store under `base` from the repository at `url`.
    ///
    /// Clones `url` into `.credmatch-store/`. If cloning fails (for example an
    /// empty or not yet existing remote) an empty repository with `origin` set
    /// to `url` is created instead.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` if `base` already has a store.
    /// Returns `SyncError::CloneFailed` if neither clone nor create works; the
    /// store directory is removed again.
    pub fn init(base: &Path, url: &str, cipher: Age) -> Result<Initialized> {
        validate_url(url)?;
        ensure_fresh(base)?;

        let location = Location::resolve(base, StoreMode::Dedicated);
        let git = Git::locate(location.dir())?;

        let created = sync::clone_or_create(&git, url)?;
        debug!(created = ?created, "store repository ready");

        let config = Config::new(StoreMode::Dedicated, Some(url.to_string()));
        if let Err(e) = config.save(base) {
            let _ = std::fs::remove_dir_all(location.dir());
            return Err(e);
        }

        info!(dir = %location.dir().display(), "initialized dedicated store");
        Ok(Initialized {
            vault: Self::assemble(base, location, cipher, git),
            created,
        })
    }

    /// Adopt the git working tree at `base` as the store.
    ///
    /// An existing `credentials.enc` is kept and used as is.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotAGitRepository` if `base` has no `.git`.
    /// Returns `StoreError::AlreadyInitialized` if `base` already has a store.
    pub fn init_here(base: &Path, cipher: Age) -> Result<Self> {
        ensure_fresh(base)?;
        if !base.join(constants::GIT_DIR).exists() {
            return Err(StoreError::NotAGitRepository(base.display().to_string()).into());
        }

        let location = Location::resolve(base, StoreMode::CurrentDirectory);
        let git = Git::locate(location.dir())?;
        Config::new(StoreMode::CurrentDirectory, None).save(base)?;

        info!(dir = %base.display(), "initialized store in current directory");
        Ok(Self::assemble(base, location, cipher, git))
    }
}

fn ensure_fresh(base: &Path) -> Result<()> {
    if Config::exists(base) || base.join(constants::STORE_DIR).exists() {
        return Err(StoreError::AlreadyInitialized(base.display().to_string()).into());
    }
    Ok(())
}
