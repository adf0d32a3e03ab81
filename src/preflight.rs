//! Preflight checks run before anything mutates the repository.

use crate::error::{ReleaseError, Result};
use crate::git::SourceControl;
use crate::process;
use crate::ui;

/// External tools the release workflow delegates to.
const REQUIRED_TOOLS: &[&str] = &["git", "gh"];

/// Fail fatally naming the first required external tool missing from PATH.
pub fn ensure_dependencies() -> Result<()> {
    ensure_tools(process::tool_on_path)
}

fn ensure_tools(available: impl Fn(&str) -> bool) -> Result<()> {
    for tool in REQUIRED_TOOLS {
        if !available(tool) {
            return Err(ReleaseError::MissingTool(tool.to_string()));
        }
    }
    Ok(())
}

/// Verify the current branch matches policy and is not behind its upstream.
///
/// If the branch tracks an upstream: fetch (failures ignored), read the
/// behind/ahead counts, and when the branch is only behind attempt a single
/// fast-forward pull. Still behind after that is fatal; the user reconciles
/// manually. No upstream configured skips the divergence check entirely.
pub fn ensure_branch_state(
    git: &dyn SourceControl,
    expected_branch: &str,
    remote: &str,
) -> Result<()> {
    let current = git.current_branch()?;
    if current != expected_branch {
        return Err(ReleaseError::branch(format!(
            "You are on '{}'. Switch to '{}' to release (set RELEASE_BRANCH to override).",
            current, expected_branch
        )));
    }

    if !git.has_upstream()? {
        return Ok(());
    }

    // Best-effort refresh; an offline fetch must not block the release
    let _ = git.fetch(remote);

    let mut divergence = git.divergence()?;
    if divergence.behind > 0 && divergence.ahead == 0 {
        ui::display_status(&format!(
            "Branch is behind {} by {} commit(s). Attempting fast-forward...",
            remote, divergence.behind
        ));
        git.pull_fast_forward()?;
        divergence = git.divergence()?;
    }

    if divergence.behind > 0 {
        return Err(ReleaseError::branch(
            "Local branch is behind remote. Please pull/reconcile before releasing.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::{FastForward, MockGit};

    #[test]
    fn test_ensure_tools_all_present() {
        assert!(ensure_tools(|_| true).is_ok());
    }

    #[test]
    fn test_ensure_tools_names_first_missing() {
        let err = ensure_tools(|name| name != "gh").unwrap_err();
        assert!(err.to_string().contains("gh"));

        let err = ensure_tools(|_| false).unwrap_err();
        assert!(err.to_string().contains("git"));
    }

    #[test]
    fn test_wrong_branch_is_fatal() {
        let git = MockGit::new();
        git.set_branch("feature/x");
        let err = ensure_branch_state(&git, "master", "origin").unwrap_err();
        assert!(err.to_string().contains("feature/x"));
        assert!(err.to_string().contains("master"));
    }

    #[test]
    fn test_no_upstream_skips_divergence_check() {
        let git = MockGit::new();
        git.set_upstream(false);
        git.set_divergence(5, 0);
        assert!(ensure_branch_state(&git, "master", "origin").is_ok());
        assert_eq!(git.fetch_count(), 0);
    }

    #[test]
    fn test_up_to_date_branch_passes() {
        let git = MockGit::new();
        assert!(ensure_branch_state(&git, "master", "origin").is_ok());
        assert_eq!(git.fetch_count(), 1);
        assert_eq!(git.fast_forward_count(), 0);
    }

    #[test]
    fn test_behind_only_fast_forwards() {
        let git = MockGit::new();
        git.set_divergence(2, 0);
        assert!(ensure_branch_state(&git, "master", "origin").is_ok());
        assert_eq!(git.fast_forward_count(), 1);
    }

    #[test]
    fn test_still_behind_after_fast_forward_is_fatal() {
        let git = MockGit::new();
        git.set_divergence(2, 0);
        git.set_fast_forward(FastForward::StaysBehind);
        let err = ensure_branch_state(&git, "master", "origin").unwrap_err();
        assert!(err.to_string().contains("behind"));
    }

    #[test]
    fn test_diverged_branch_is_fatal_without_pull() {
        // behind and ahead: never attempt a fast-forward
        let git = MockGit::new();
        git.set_divergence(2, 3);
        let err = ensure_branch_state(&git, "master", "origin").unwrap_err();
        assert!(err.to_string().contains("behind"));
        assert_eq!(git.fast_forward_count(), 0);
    }

    #[test]
    fn test_ahead_only_passes() {
        let git = MockGit::new();
        git.set_divergence(0, 4);
        assert!(ensure_branch_state(&git, "master", "origin").is_ok());
    }

    #[test]
    fn test_failed_fast_forward_propagates() {
        let git = MockGit::new();
        git.set_divergence(1, 0);
        git.set_fast_forward(FastForward::Fails);
        assert!(ensure_branch_state(&git, "master", "origin").is_err());
    }
}
