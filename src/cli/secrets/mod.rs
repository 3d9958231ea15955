//! Credential commands.

pub mod fetch;
pub mod list;
pub mod store;
