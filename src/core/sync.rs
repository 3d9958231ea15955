//! Sync coordinator.
//!
//! Pulls before reads, publishes after writes, and supplies the remote and
//! ancestor versions of the store file when a push loses a race. Network and
//! merge trouble on pull is never fatal: the local copy stays usable and the
//! caller reports a warning.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::constants::{DEFAULT_BRANCH, REMOTE};
use crate::core::git::{CommitInfo, Git, Push};
use crate::error::{Result, SyncError};

/// Result of [`pull_latest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pull {
    /// No `origin` remote configured.
    NoRemote,
    /// Already at the remote state (or both sides are still empty).
    UpToDate,
    /// Fast-forwarded to the remote state.
    Updated,
    /// Local commits not yet on the remote (which may have no branch yet).
    Ahead,
    /// Local and remote histories have both moved on.
    Diverged,
    /// Fetch or merge failed; local state used as-is.
    Failed(String),
}

/// Push status after [`publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Pushed,
    NoRemote,
    /// Push failed for a reason other than a conflict; commit kept locally.
    Failed(String),
}

/// Result of [`publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Whether a commit was created
    pub committed: bool,
    pub delivery: Delivery,
}

/// How `init` obtained its repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Cloned,
    /// Clone failed; a fresh repository pointing at the URL was created.
    Initialized { reason: String },
}

/// Remote and common-ancestor versions of the store file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVersions {
    /// Remote-tracking ref, e.g. `origin/main`
    pub upstream: String,
    /// File content at the remote tip
    pub theirs: Option<String>,
    /// File content at the merge base
    pub base: Option<String>,
}

/// Read-only repository state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoState {
    pub remote: Option<String>,
    pub branch: Option<String>,
    /// `git status --porcelain` lines
    pub changes: Vec<String>,
    pub last_commit: Option<CommitInfo>,
}

/// Bring the working tree up to the remote state, best effort.
pub fn pull_latest(git: &Git) -> Pull {
    if git.remote_url(REMOTE).is_none() {
        debug!("no remote configured, skipping pull");
        return Pull::NoRemote;
    }

    let branch = match git.current_branch() {
        Ok(b) => b,
        Err(e) => return Pull::Failed(e.to_string()),
    };

    if let Err(e) = git.fetch(REMOTE) {
        warn!("fetch failed, using local store");
        return Pull::Failed(e.to_string());
    }

    let upstream = format!("{}/{}", REMOTE, branch);
    let head = git.rev_parse("HEAD");
    let Some(theirs) = git.rev_parse(&upstream) else {
        debug!(upstream = %upstream, "remote branch does not exist yet");
        return if head.is_some() {
            Pull::Ahead
        } else {
            Pull::UpToDate
        };
    };

    if head.as_deref() == Some(theirs.as_str()) {
        return Pull::UpToDate;
    }

    if let Some(head) = &head {
        match git.merge_base(head, &theirs) {
            Some(base) if base == theirs => return Pull::Ahead,
            Some(base) if base == *head => {}
            _ => return Pull::Diverged,
        }
    }

    match git.merge_ff_only(&upstream) {
        Ok(()) => {
            info!(upstream = %upstream, "fast-forwarded store");
            Pull::Updated
        }
        Err(e) => Pull::Failed(e.to_string()),
    }
}

/// Push local commits when the remote is behind.
pub fn push_pending(git: &Git) -> Result<Delivery> {
    deliver(git)
}

/// Stage, commit and push the store file.
///
/// # Errors
///
/// Returns `SyncError::Conflict` if the remote rejects the push as a
/// non-fast-forward; the local commit is kept. Returns `SyncError::Git` if
/// staging or committing fails.
pub fn publish(git: &Git, file: &str, message: &str) -> Result<Published> {
    git.add(file)?;
    let committed = git.has_staged_changes(Some(file));
    if committed {
        git.commit(message, Some(file))?;
    } else {
        debug!("store file unchanged, nothing to commit");
    }

    let delivery = deliver(git)?;
    Ok(Published {
        committed,
        delivery,
    })
}

fn deliver(git: &Git) -> Result<Delivery> {
    if git.remote_url(REMOTE).is_none() {
        debug!("no remote configured, skipping push");
        return Ok(Delivery::NoRemote);
    }
    let branch = git.current_branch()?;
    match git.push(REMOTE, &branch)? {
        Push::Pushed => Ok(Delivery::Pushed),
        Push::Rejected(reason) => Err(SyncError::Conflict(reason).into()),
        Push::Failed(reason) => {
            warn!("push failed, commit kept locally");
            Ok(Delivery::Failed(reason))
        }
    }
}

/// Fetch and read the remote and merge-base versions of `file`.
///
/// # Errors
///
/// Returns `SyncError::Conflict` if the remote cannot be fetched.
pub fn remote_versions(git: &Git, file: &str) -> Result<RemoteVersions> {
    let branch = git.current_branch()?;
    git.fetch(REMOTE)
        .map_err(|e| SyncError::Conflict(format!("could not fetch remote: {}", e)))?;

    let upstream = format!("{}/{}", REMOTE, branch);
    let theirs = git.show(&upstream, file);
    let base = git
        .merge_base("HEAD", &upstream)
        .and_then(|rev| git.show(&rev, file));

    Ok(RemoteVersions {
        upstream,
        theirs,
        base,
    })
}

/// Start a merge of `upstream` that keeps the local tree.
///
/// # Errors
///
/// Returns `SyncError::Conflict` if git refuses the merge.
pub fn begin_merge(git: &Git, upstream: &str) -> Result<()> {
    git.merge_keep_ours(upstream).map_err(|e| {
        git.merge_abort();
        SyncError::Conflict(format!("could not merge {}: {}", upstream, e)).into()
    })
}

/// Commit a merge started by [`begin_merge`] and push it.
///
/// # Errors
///
/// Returns `SyncError::Conflict` if the push is rejected again.
pub fn finish_merge(git: &Git, file: &str, message: &str) -> Result<Published> {
    let committed = git.add(file).and_then(|()| git.commit(message, None));
    if let Err(e) = committed {
        git.merge_abort();
        return Err(e);
    }
    let delivery = deliver(git)?;
    Ok(Published {
        committed: true,
        delivery,
    })
}

/// Current remote, branch, working tree changes and last commit.
///
/// # Errors
///
/// Returns `SyncError::Git` if `git status` fails.
pub fn status(git: &Git) -> Result<RepoState> {
    Ok(RepoState {
        remote: git.remote_url(REMOTE),
        branch: git.current_branch().ok(),
        changes: git.status_lines()?,
        last_commit: git.last_commit(),
    })
}

/// Clone `url` into the git directory, or create a repository there that
/// points at it.
///
/// On failure the directory is removed again.
///
/// # Errors
///
/// Returns `SyncError::CloneFailed` if both cloning and creating fail.
pub fn clone_or_create(git: &Git, url: &str) -> Result<Created> {
    let dir = git.dir().to_path_buf();
    let clone_err = match git.clone_from(url).and_then(|()| settle_branch(git)) {
        Ok(()) => return Ok(Created::Cloned),
        Err(e) => e,
    };
    debug!(error = %clone_err, "clone failed, creating repository");

    if dir.exists() {
        let _ = std::fs::remove_dir_all(&dir);
    }

    let created = std::fs::create_dir_all(&dir)
        .map_err(crate::error::Error::from)
        .and_then(|()| git.init())
        .and_then(|()| git.add_remote(REMOTE, url))
        .and_then(|()| settle_branch(git));

    match created {
        Ok(()) => Ok(Created::Initialized {
            reason: clone_err.to_string(),
        }),
        Err(e) => {
            let _ = std::fs::remove_dir_all(&dir);
            Err(SyncError::CloneFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into())
        }
    }
}

/// Put a store without history on the branch the remote already uses.
///
/// A clone of an empty remote, or a fresh repository, starts on whatever
/// `init.defaultBranch` the host has. Every machine must publish to the same
/// branch, so an unborn HEAD follows the remote's existing branch (preferring
/// `main`) and falls back to `main`.
fn settle_branch(git: &Git) -> Result<()> {
    if git.rev_parse("HEAD").is_some() {
        return Ok(());
    }

    let branches = git.remote_branches(REMOTE);
    let existing = branches
        .iter()
        .find(|b| b.as_str() == DEFAULT_BRANCH)
        .or_else(|| branches.first());

    match existing {
        Some(branch) => {
            git.fetch(REMOTE)?;
            git.checkout_branch(branch, &format!("{}/{}", REMOTE, branch))?;
            debug!(branch = %branch, "checked out existing remote branch");
        }
        None => {
            git.set_unborn_branch(DEFAULT_BRANCH)?;
            debug!(branch = DEFAULT_BRANCH, "using default branch");
        }
    }
    Ok(())
}
