// Issue id lookup from the current git branch.

use std::process::Command;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;

static ISSUE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-z][a-z0-9_]*-\d+)\b").unwrap());

/// Name of the checked out branch, as reported by `git rev-parse`.
pub fn current_branch() -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .context("failed to run git")?;
    if !output.status.success() {
        bail!(
            "git rev-parse failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// First `PROJECT-123` token in a branch name, upper-cased.
///
/// `feature/cli-42-stopwatch` gives `CLI-42`.
pub fn issue_id_from_branch(branch: &str) -> Option<String> {
    ISSUE_ID_RE
        .captures(branch)
        .map(|caps| caps[1].to_ascii_uppercase())
}
