//! Commit-time probe via `git log`.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;

use markscan_core::timing::SubmissionTime;

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Committer date of `HEAD` in strict ISO 8601, as printed by git.
pub async fn last_commit_iso(repo: &Path, timeout: Duration) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(["log", "-1", "--format=%cI"])
        .current_dir(repo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .context("git log timed out")?
        .context("failed to run git log")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git log failed: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Submission time taken from the last commit. Any failure yields
/// [`SubmissionTime::Unknown`], which the timing policy treats as late.
pub async fn last_commit_time(repo: &Path, timeout: Duration) -> SubmissionTime {
    match last_commit_iso(repo, timeout).await {
        Ok(raw) => {
            tracing::debug!("last commit at {raw}");
            SubmissionTime::parse(&raw)
        }
        Err(e) => {
            tracing::warn!("could not determine commit time: {e:#}");
            SubmissionTime::Unknown
        }
    }
}
