//! Test support utilities for credmatch integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::Path;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working directory and home directory. No
/// process-global state is mutated; child processes use `.current_dir()` so
/// tests can run in parallel.
pub struct Test {
    /// Directory the binary runs in
    pub dir: TempDir,
    /// Temporary home directory (keeps the user's git config out)
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment whose directory is a git working tree
    /// adopted with `credmatch init-here`.
    pub fn init_here() -> Self {
        let t = Self::new();
        t.git(&["init", "--quiet"]);
        let output = t.init_here_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize store: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create a test environment with a dedicated store cloned from `remote`.
    pub fn clone_of(remote: &Remote) -> Self {
        let t = Self::new();
        let output = t.init(&remote.url());
        assert!(
            output.status.success(),
            "Failed to initialize store: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an initialized test environment with credentials stored.
    pub fn with_credentials(pairs: &[(&str, &str)]) -> Self {
        let t = Self::init_here();
        for (k, v) in pairs {
            let output = t.store(k, v);
            assert!(
                output.status.success(),
                "Failed to store {}: {}",
                k,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }

    /// Path of a file relative to the working directory.
    pub fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    /// Run git in the working directory, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        git_in(self.dir.path(), self.home.path(), args)
    }
}

/// A bare repository acting as the shared remote.
pub struct Remote {
    pub dir: TempDir,
}

impl Remote {
    /// Create an empty bare repository.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create remote dir");
        let home = TempDir::new().expect("failed to create temp home");
        git_in(dir.path(), home.path(), &["init", "--bare", "--quiet"]);
        Self { dir }
    }

    pub fn url(&self) -> String {
        self.dir.path().to_string_lossy().to_string()
    }
}

fn git_in(dir: &Path, home: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
