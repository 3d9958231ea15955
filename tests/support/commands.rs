//! Command helper methods for Test.

use super::{fixtures, Test};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a credmatch command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - a low scrypt work factor
    /// - colors and log overrides switched off
    /// - current directory set to the test directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("credmatch").expect("failed to find credmatch binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env("CREDMATCH_WORK_FACTOR", fixtures::WORK_FACTOR);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("CREDMATCH_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("failed to run credmatch {:?}: {}", args, e))
    }

    /// Shortcut for `credmatch init <url>`.
    pub fn init(&self, url: &str) -> Output {
        self.run(&["init", url])
    }

    /// Shortcut for `credmatch init-here`.
    pub fn init_here_cmd(&self) -> Output {
        self.run(&["init-here"])
    }

    /// Shortcut for `credmatch store` with the default password.
    pub fn store(&self, key: &str, value: &str) -> Output {
        self.store_with(key, value, fixtures::PASSWORD)
    }

    /// Shortcut for `credmatch store` with an explicit password.
    pub fn store_with(&self, key: &str, value: &str, password: &str) -> Output {
        self.run(&["store", key, value, password])
    }

    /// Shortcut for `credmatch fetch` with the default password.
    pub fn fetch(&self, key: &str) -> Output {
        self.fetch_with(key, fixtures::PASSWORD)
    }

    /// Shortcut for `credmatch fetch` with an explicit password.
    pub fn fetch_with(&self, key: &str, password: &str) -> Output {
        self.run(&["fetch", key, password])
    }

    /// Shortcut for `credmatch list` with the default password.
    pub fn list(&self) -> Output {
        self.list_with(fixtures::PASSWORD)
    }

    /// Shortcut for `credmatch list` with an explicit password.
    pub fn list_with(&self, password: &str) -> Output {
        self.run(&["list", password])
    }

    /// Shortcut for `credmatch list --json`.
    pub fn list_json(&self) -> Output {
        self.run(&["list", fixtures::PASSWORD, "--json"])
    }

    /// Shortcut for `credmatch sync` with the default password.
    pub fn sync(&self) -> Output {
        self.run(&["sync", fixtures::PASSWORD])
    }

    /// Shortcut for `credmatch status`.
    pub fn status(&self) -> Output {
        self.run(&["status"])
    }

    /// Shortcut for `credmatch status --json`.
    pub fn status_json(&self) -> Output {
        self.run(&["status", "--json"])
    }
}
