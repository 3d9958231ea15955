//! git process wrapper.
//!
//! Thin, synchronous wrapper over the `git` executable. Every command runs in
//! the store working tree with terminal prompts disabled, so an unreachable
//! remote fails instead of blocking on credentials.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SyncError};

/// Outcome of a push attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push {
    /// Remote accepted the update.
    Pushed,
    /// Remote refused a non-fast-forward update.
    Rejected(String),
    /// Any other failure (network, auth, missing repository).
    Failed(String),
}

/// Summary of the most recent commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub time: Option<DateTime<Utc>>,
    pub subject: String,
}

/// git bound to one working tree.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
    dir: PathBuf,
    env: Vec<(String, OsString)>,
    /// Author used when the repository has no `user.email`, looked up once.
    fallback_author: OnceLock<Option<String>>,
}

impl Git {
    /// Locate `git` on PATH and bind it to `dir`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::GitNotFound` if git is not installed.
    pub fn locate(dir: &Path) -> Result<Self> {
        let program = which::which("git").map_err(|_| SyncError::GitNotFound)?;
        Ok(Self {
            program,
            dir: dir.to_path_buf(),
            env: Vec::new(),
            fallback_author: OnceLock::new(),
        })
    }

    /// The same git executable bound to another directory.
    pub fn at(&self, dir: &Path) -> Self {
        Self {
            program: self.program.clone(),
            dir: dir.to_path_buf(),
            env: self.env.clone(),
            fallback_author: OnceLock::new(),
        }
    }

    /// Run every command against an empty user configuration under `home`.
    #[cfg(test)]
    pub(crate) fn isolated(mut self, home: &Path) -> Self {
        self.env = vec![
            ("HOME".to_string(), home.as_os_str().to_owned()),
            ("XDG_CONFIG_HOME".to_string(), home.join(".config").into_os_string()),
            ("GIT_CONFIG_GLOBAL".to_string(), home.join(".gitconfig").into_os_string()),
            ("GIT_CONFIG_NOSYSTEM".to_string(), OsString::from("1")),
        ];
        self.fallback_author = OnceLock::new();
        self
    }

    /// Working tree this instance runs in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bare_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());
        cmd
    }

    /// Command with the identity fallback applied, so commits and merges
    /// work without a configured `user.email`.
    fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        if let Some(user) = self.fallback_author() {
            let email = format!("{}@localhost", user);
            cmd.env("GIT_AUTHOR_NAME", user)
                .env("GIT_AUTHOR_EMAIL", &email)
                .env("GIT_COMMITTER_NAME", user)
                .env("GIT_COMMITTER_EMAIL", &email);
        }
        cmd
    }

    /// OS username when git has no identity configured for this directory.
    fn fallback_author(&self) -> Option<&str> {
        self.fallback_author
            .get_or_init(|| {
                let configured = self
                    .bare_command()
                    .args(["config", "user.email"])
                    .output()
                    .map(|o| o.status.success());
                match configured {
                    Ok(false) => {
                        let user = whoami::username();
                        debug!(user = %user, "no git identity configured, using fallback");
                        Some(user)
                    }
                    _ => None,
                }
            })
            .as_deref()
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(dir = %self.dir.display(), args = ?args, "git");
        Ok(self.command().args(args).output()?)
    }

    /// Run a command and return trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Git` with git's stderr on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        Ok(self.run_raw(args)?.trim().to_string())
    }

    /// Like [`Git::run`], without trimming stdout.
    fn run_raw(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(failure(args, &output).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a command, reporting only whether it succeeded.
    fn probe(&self, args: &[&str]) -> bool {
        self.output(args)
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Clone `url` into this instance's directory.
    pub fn clone_from(&self, url: &str) -> Result<()> {
        let parent = match self.dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dest = self.dir.to_string_lossy().to_string();
        self.at(&parent).run(&["clone", "--quiet", "--", url, &dest])?;
        Ok(())
    }

    /// `git init` in this directory.
    pub fn init(&self) -> Result<()> {
        self.run(&["init", "--quiet"]).map(|_| ())
    }

    /// Whether this directory is inside a git working tree.
    pub fn is_work_tree(&self) -> bool {
        self.probe(&["rev-parse", "--is-inside-work-tree"])
    }

    /// Add a remote.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url]).map(|_| ())
    }

    /// URL of a remote, if configured.
    pub fn remote_url(&self, name: &str) -> Option<String> {
        self.run(&["remote", "get-url", name]).ok()
    }

    /// Current branch name (works on an unborn branch).
    pub fn current_branch(&self) -> Result<String> {
        self.run(&["symbolic-ref", "--short", "HEAD"])
    }

    /// Point an unborn HEAD at `branch`.
    pub fn set_unborn_branch(&self, branch: &str) -> Result<()> {
        self.run(&["symbolic-ref", "HEAD", &format!("refs/heads/{}", branch)])
            .map(|_| ())
    }

    /// Check out `branch` at `start`, creating or resetting it.
    pub fn checkout_branch(&self, branch: &str, start: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", "-B", branch, start])
            .map(|_| ())
    }

    /// Branch names published on a remote.
    pub fn remote_branches(&self, remote: &str) -> Vec<String> {
        self.run(&["ls-remote", "--heads", remote])
            .map(|out| {
                out.lines()
                    .filter_map(|line| line.split_once("refs/heads/"))
                    .map(|(_, name)| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolve a revision to a commit hash.
    pub fn rev_parse(&self, rev: &str) -> Option<String> {
        self.run(&["rev-parse", "--verify", "--quiet", &format!("{}^{{commit}}", rev)])
            .ok()
    }

    /// Fetch a remote.
    pub fn fetch(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", "--quiet", remote]).map(|_| ())
    }

    /// Fast-forward the current branch to `rev`.
    pub fn merge_ff_only(&self, rev: &str) -> Result<()> {
        self.run(&["merge", "--ff-only", "--quiet", rev]).map(|_| ())
    }

    /// Start a merge of `rev` that keeps our tree, leaving it uncommitted.
    pub fn merge_keep_ours(&self, rev: &str) -> Result<()> {
        self.run(&[
            "merge",
            "--no-ff",
            "--no-commit",
            "--allow-unrelated-histories",
            "-s",
            "ours",
            rev,
        ])
        .map(|_| ())
    }

    /// Abort an in-progress merge.
    pub fn merge_abort(&self) {
        let _ = self.run(&["merge", "--abort"]);
    }

    /// Best common ancestor of two revisions.
    pub fn merge_base(&self, a: &str, b: &str) -> Option<String> {
        self.run(&["merge-base", a, b]).ok()
    }

    /// Contents of `path` (relative to this directory) at `rev`.
    pub fn show(&self, rev: &str, path: &str) -> Option<String> {
        self.run_raw(&["show", &format!("{}:./{}", rev, path)]).ok()
    }

    /// Stage a path.
    pub fn add(&self, path: &str) -> Result<()> {
        self.run(&["add", "--", path]).map(|_| ())
    }

    /// Whether anything is staged, optionally limited to one path.
    pub fn has_staged_changes(&self, path: Option<&str>) -> bool {
        match path {
            Some(path) => !self.probe(&["diff", "--cached", "--quiet", "--", path]),
            None => !self.probe(&["diff", "--cached", "--quiet"]),
        }
    }

    /// Commit staged changes, only those to `path` when given.
    pub fn commit(&self, message: &str, path: Option<&str>) -> Result<()> {
        let mut args = vec!["commit", "--quiet", "-m", message];
        if let Some(path) = path {
            args.extend(["--", path]);
        }
        self.run(&args).map(|_| ())
    }

    /// Push `branch` to `remote`.
    pub fn push(&self, remote: &str, branch: &str) -> Result<Push> {
        let refspec = format!("HEAD:refs/heads/{}", branch);
        let output = self.output(&["push", "--porcelain", remote, &refspec])?;
        if output.status.success() {
            return Ok(Push::Pushed);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let rejected = stdout.contains("[rejected]")
            || stderr.contains("non-fast-forward")
            || stderr.contains("fetch first");
        let reason = stderr.trim().to_string();
        Ok(if rejected {
            Push::Rejected(reason)
        } else {
            Push::Failed(reason)
        })
    }

    /// Porcelain status lines.
    pub fn status_lines(&self) -> Result<Vec<String>> {
        Ok(self
            .run_raw(&["status", "--porcelain"])?
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Most recent commit, if the branch has one.
    pub fn last_commit(&self) -> Option<CommitInfo> {
        let raw = self.run(&["log", "-1", "--format=%h%x1f%ct%x1f%s"]).ok()?;
        let mut parts = raw.splitn(3, '\u{1f}');
        let hash = parts.next()?.to_string();
        let time = parts
            .next()
            .and_then(|t| t.parse::<i64>().ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        let subject = parts.next().unwrap_or_default().to_string();
        if hash.is_empty() {
            return None;
        }
        Some(CommitInfo {
            hash,
            time,
            subject,
        })
    }
}

fn failure(args: &[&str], output: &Output) -> SyncError {
    SyncError::Git {
        command: args.first().copied().unwrap_or_default().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}
