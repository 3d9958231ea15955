//! Master password input.
//!
//! Taken from the command line if given, else read from piped stdin, else
//! prompted for with hidden input.

use std::io::{self, BufRead, IsTerminal};

use dialoguer::Password;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::cipher::Passphrase;
use crate::core::interrupt::CancellationToken;
use crate::error::{Result, ValidationError};

/// Obtain the master password.
///
/// `confirm` asks for the password twice; used when the store has no
/// ciphertext yet, so a typo does not lock the first credential away.
///
/// # Errors
///
/// Returns `ValidationError::PasswordRequired` if there is no argument, no
/// piped input and no terminal. Returns `ValidationError::EmptyPassword` for
/// an empty password.
pub fn master_password(
    arg: Option<String>,
    confirm: bool,
    cancel: &CancellationToken,
) -> Result<Passphrase> {
    if let Some(password) = arg {
        warn!("master password passed as an argument; it may be visible in shell history and process listings");
        return Passphrase::new(password);
    }

    if !io::stdin().is_terminal() {
        debug!("reading master password from stdin");
        return read_piped(io::stdin().lock());
    }

    let _guard = cancel.prompting();
    let mut prompt = Password::new().with_prompt("Master password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm master password", "passwords do not match");
    }
    let password = prompt.interact()?;
    cancel.checkpoint()?;
    Passphrase::new(password)
}

/// Read one line of piped input as the password.
fn read_piped(mut input: impl BufRead) -> Result<Passphrase> {
    let mut line = Zeroizing::new(String::new());
    if input.read_line(&mut line)? == 0 {
        return Err(ValidationError::PasswordRequired.into());
    }
    let password = line.trim_end_matches(['\n', '\r']);
    Passphrase::new(password.to_string())
}
