//! credmatch - password-encrypted credentials, synchronized through git.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use credmatch::cli::output;
use credmatch::cli::{execute, Cli};
use credmatch::core::constants;
use credmatch::core::interrupt::{self, CancellationToken};
use credmatch::error::EXIT_FAILURE;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("credmatch=debug")
        } else {
            EnvFilter::new("credmatch=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cancel = CancellationToken::new();
    interrupt::install(&cancel);

    if let Err(e) = execute(cli, &cancel) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(e.exit_code());
    }
}
