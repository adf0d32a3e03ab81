//! Source-control backend driving the system `git` CLI.

use crate::error::{ReleaseError, Result};
use crate::git::{Divergence, SourceControl};
use crate::process;

/// [SourceControl] implementation that shells out to `git`.
///
/// All commands run in the process working directory, which is expected to
/// be inside the repository being released.
#[derive(Debug, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        SystemGit
    }
}

impl SourceControl for SystemGit {
    fn current_branch(&self) -> Result<String> {
        process::run_capture("git", &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn has_upstream(&self) -> Result<bool> {
        let probe = process::run_query("git", &["rev-parse", "--verify", "--quiet", "@{u}"])?;
        Ok(probe.success)
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        process::run("git", &["fetch", "-p", remote])
    }

    fn divergence(&self) -> Result<Divergence> {
        let counts = process::run_capture(
            "git",
            &["rev-list", "--left-right", "--count", "@{u}...HEAD"],
        )?;

        let mut parts = counts.split_whitespace();
        let behind = parts.next().and_then(|n| n.parse().ok());
        let ahead = parts.next().and_then(|n| n.parse().ok());
        match (behind, ahead) {
            (Some(behind), Some(ahead)) => Ok(Divergence { behind, ahead }),
            _ => Err(ReleaseError::branch(format!(
                "Unexpected rev-list output: '{}'",
                counts
            ))),
        }
    }

    fn pull_fast_forward(&self) -> Result<()> {
        process::run("git", &["pull", "--ff-only"])
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        // describe fails when no tag is reachable; that is a soft answer
        let probe = process::run_query("git", &["describe", "--tags", "--abbrev=0"])?;
        if probe.success && !probe.stdout.is_empty() {
            Ok(Some(probe.stdout))
        } else {
            Ok(None)
        }
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let listed = process::run_capture("git", &["tag", "--list", name])?;
        Ok(listed.lines().any(|l| l.trim() == name))
    }

    fn create_annotated_tag(&self, name: &str) -> Result<()> {
        process::run("git", &["tag", "-a", name, "-m", name])
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        // diff --quiet exits non-zero when differences exist
        let unstaged = process::run_query("git", &["diff", "--quiet"])?;
        let staged = process::run_query("git", &["diff", "--cached", "--quiet"])?;
        Ok(!unstaged.success || !staged.success)
    }

    fn stage_all(&self) -> Result<()> {
        process::run("git", &["add", "-A"])
    }

    fn stage(&self, path: &str) -> Result<()> {
        process::run("git", &["add", path])
    }

    fn commit(&self, message: &str) -> Result<()> {
        process::run("git", &["commit", "-m", message])
    }

    fn push(&self) -> Result<()> {
        process::run("git", &["push"])
    }

    fn push_set_upstream(&self, remote: &str) -> Result<()> {
        process::run("git", &["push", "-u", remote, "HEAD"])
    }

    fn push_follow_tags(&self, remote: &str) -> Result<()> {
        process::run("git", &["push", "--follow-tags", remote, "HEAD"])
    }

    fn subjects_since(&self, last_tag: Option<&str>) -> Result<Vec<String>> {
        // With no tag the range covers the whole history, first commit included
        let range = match last_tag {
            Some(tag) => format!("{}..HEAD", tag),
            None => "HEAD".to_string(),
        };

        let log = process::run_capture(
            "git",
            &["log", "--no-merges", "--pretty=format:%s", &range],
        )?;

        Ok(log
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}
