//! Constants used throughout credmatch.
//!
//! Centralizes magic strings and configuration values.

/// Mode marker written by `init` / `init-here` (.credmatch.toml).
pub const CONFIG_FILE: &str = ".credmatch.toml";

/// Dedicated store subdirectory.
pub const STORE_DIR: &str = ".credmatch-store";

/// Encrypted ledger file inside the store location.
pub const ENCRYPTED_FILE: &str = "credentials.enc";

/// git metadata entry probed for current-directory mode.
pub const GIT_DIR: &str = ".git";

/// Name of the remote used for synchronization.
pub const REMOTE: &str = "origin";

/// Environment variable selecting the log filter.
pub const LOG_ENV: &str = "CREDMATCH_LOG";

/// Branch used when neither the clone nor the remote decides one.
pub const DEFAULT_BRANCH: &str = "main";
