//! Core library components.
//!
//! Everything below the command line: the cipher, the ledger format, the
//! store backend, git synchronization and the [`vault::Vault`] tying them
//! together.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod git;
pub mod interrupt;
pub mod ledger;
pub mod store;
pub mod sync;
pub mod validation;
pub mod vault;
