//! Command-line interface.

pub mod completions;
pub mod init;
pub mod output;
pub mod prompt;
pub mod secrets;
pub mod status;
pub mod sync;

use clap::{Parser, Subcommand};

use crate::core::cipher::Age;
use crate::core::interrupt::CancellationToken;
use crate::error::Result;

/// credmatch - password-encrypted credentials, synchronized through git.
#[derive(Parser)]
#[command(
    name = "credmatch",
    about = "Password-encrypted credential store synchronized through git",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// scrypt work factor (log2 N) for new encryptions
    #[arg(
        long,
        global = true,
        env = "CREDMATCH_WORK_FACTOR",
        value_parser = clap::value_parser!(u8).range(1..=30)
    )]
    pub work_factor: Option<u8>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Cipher configured by the global flags.
    pub fn cipher(&self) -> Result<Age> {
        match self.work_factor {
            Some(log_n) => Age::with_work_factor(log_n),
            None => Ok(Age::new()),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Clone a credential repository into .credmatch-store
    Init {
        /// Repository URL
        url: String,
    },

    /// Use the current git working tree as the credential store
    InitHere,

    /// Store or overwrite a credential
    Store {
        /// Credential key
        key: String,
        /// Credential value
        value: String,
        /// Master password (prompted if omitted; visible to other users when given here)
        password: Option<String>,
    },

    /// Print a credential value
    Fetch {
        /// Credential key
        key: String,
        /// Master password (prompted if omitted)
        password: Option<String>,
    },

    /// List all credentials
    List {
        /// Master password (prompted if omitted)
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pull remote changes and push local ones
    Sync {
        /// Master password, needed only to merge diverged histories
        password: Option<String>,
    },

    /// Show store and repository state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Run a parsed command line, stopping early once `cancel` is tripped.
pub fn execute(cli: Cli, cancel: &CancellationToken) -> Result<()> {
    let cipher = cli.cipher()?;
    match cli.command {
        Command::Init { url } => init::execute(&url, cipher),
        Command::InitHere => init::execute_here(cipher),
        Command::Store {
            key,
            value,
            password,
        } => secrets::store::execute(&key, &value, password, cipher, cancel),
        Command::Fetch { key, password } => {
            secrets::fetch::execute(&key, password, cipher, cancel)
        }
        Command::List { password, json } => {
            secrets::list::execute(password, json, cipher, cancel)
        }
        Command::Sync { password } => sync::execute(password, cipher, cancel),
        Command::Status { json } => status::execute(json, cipher),
        Command::Completions { shell } => completions::execute(shell),
    }
}
