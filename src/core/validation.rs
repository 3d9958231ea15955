//! Input validation for store operations.
//!
//! A ledger line is `KEY=VALUE`, so keys cannot contain `=` and neither side
//! can span lines.

use crate::error::{Result, ValidationError};

/// Validate a credential key.
///
/// Keys must be non-empty, must not contain `=` and must not contain line
/// breaks. Any other text is accepted.
///
/// # Errors
///
/// Returns `ValidationError::EmptyKey` or `ValidationError::InvalidKey`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if let Some(i) = key.find('=') {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: format!("'=' at position {} is not allowed", i + 1),
        }
        .into());
    }

    if key.contains(['\n', '\r']) {
        return Err(ValidationError::InvalidKey {
            key: key.escape_debug().to_string(),
            reason: "line breaks are not allowed".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validate a credential value.
///
/// Values must be non-empty and fit on one line. `=` is fine.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` or `ValidationError::InvalidValue`.
/// The value itself never appears in the error.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue(key.to_string()).into());
    }

    if value.contains(['\n', '\r']) {
        return Err(ValidationError::InvalidValue {
            key: key.to_string(),
            reason: "line breaks are not allowed".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validate a repository URL for `init`.
///
/// # Errors
///
/// Returns `ValidationError::EmptyUrl` for a blank URL.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(ValidationError::EmptyUrl.into());
    }
    Ok(())
}
