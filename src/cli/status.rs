//! Status command - store and repository overview.

use crate::cli::output;
use crate::core::cipher::Age;
use crate::core::vault::Vault;
use crate::error::Result;

/// Show where the store lives and what git thinks of it.
pub fn execute(json: bool, cipher: Age) -> Result<()> {
    let vault = Vault::open(&std::env::current_dir()?, cipher)?;
    let status = vault.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    output::section("credmatch status");
    output::kv("mode", status.mode);
    output::kv("store", status.dir.display());
    output::kv(
        "credentials",
        if status.has_credentials {
            "present"
        } else {
            "none"
        },
    );
    output::kv("remote", status.repo.remote.as_deref().unwrap_or("none"));
    output::kv("branch", status.repo.branch.as_deref().unwrap_or("unknown"));

    match &status.repo.last_commit {
        Some(commit) => {
            let when = commit
                .time
                .map(|t| format!(" ({})", t.format("%Y-%m-%d %H:%M UTC")))
                .unwrap_or_default();
            output::kv(
                "last commit",
                format!("{} {}{}", commit.hash, commit.subject, when),
            );
        }
        None => output::kv("last commit", "none"),
    }

    if status.repo.changes.is_empty() {
        output::kv("changes", "clean");
    } else {
        output::kv("changes", status.repo.changes.len());
        for change in &status.repo.changes {
            output::list_item(change);
        }
    }

    if !status.has_credentials {
        println!();
        output::hint(&format!(
            "add your first credential with {}",
            output::cmd("credmatch store KEY value")
        ));
    }
    Ok(())
}
