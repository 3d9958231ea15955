//! credmatch - a password-encrypted credential store synchronized through git.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # init / init-here
//! │   ├── secrets       # store / fetch / list
//! │   ├── sync          # pull, push pending, merge diverged
//! │   ├── status        # remote and working tree state
//! │   ├── prompt        # master password acquisition
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Passphrase encryption (age + scrypt)
//!     ├── ledger        # key=value credential ledger
//!     ├── store/        # Store location and atomic file access
//!     ├── git           # git process wrapper
//!     ├── sync          # pull / publish / reconcile
//!     ├── config        # .credmatch.toml mode marker
//!     ├── validation    # key, value and URL checks
//!     ├── interrupt     # cooperative SIGINT handling
//!     └── vault/        # Context object tying it all together
//! ```
//!
//! # Features
//!
//! - One armored age file per store, keyed by a master password (scrypt)
//! - Last-write-wins ledger with stable ordering
//! - Atomic replace-on-write
//! - git as the sync channel and audit trail

pub mod cli;
pub mod core;
pub mod error;
