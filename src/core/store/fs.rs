//! Filesystem store.
//!
//! Reads the encrypted ledger from the store working tree and replaces it
//! through a temp file in the same directory followed by a rename, so readers
//! see either the old or the new file, never a partial one.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{Location, Store};
use crate::error::{Result, StoreError};

/// Filesystem-backed store.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filesystem;

impl Store for Filesystem {
    fn read_encrypted(&self, location: &Location) -> Result<Option<String>> {
        let path = location.file();
        if !path.exists() {
            debug!(path = %path.display(), "no encrypted ledger yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(contents))
    }

    fn write_encrypted(&self, location: &Location, contents: &str) -> Result<()> {
        write_atomic(&location.file(), contents.as_bytes())
    }
}

/// Atomically replace `path` with `contents`.
///
/// The temp file is created next to `path` (same filesystem, so the rename is
/// atomic), synced, then renamed into place. It is removed by its drop guard
/// if any step fails.
///
/// # Errors
///
/// Returns `StoreError::WriteFailed` if any step fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let failed = |source: std::io::Error| StoreError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(failed)?;
    tmp.write_all(contents).map_err(failed)?;
    tmp.as_file().sync_all().map_err(failed)?;
    tmp.persist(path).map_err(|e| failed(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file atomically");
    Ok(())
}
