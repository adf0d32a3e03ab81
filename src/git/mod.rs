//! Source-control abstraction layer.
//!
//! The release workflow never talks to git directly; it goes through the
//! [SourceControl] trait so the orchestration logic can run against a mock
//! instead of real subprocesses. The concrete implementations are:
//!
//! - [system::SystemGit]: shells out to the `git` CLI
//! - [mock::MockGit]: in-memory implementation for testing

pub mod mock;
pub mod system;

pub use mock::MockGit;
pub use system::SystemGit;

use crate::error::Result;

/// Commits behind/ahead of the configured upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Divergence {
    pub behind: usize,
    pub ahead: usize,
}

/// Narrow capability interface over the version-control tool.
///
/// Methods map one-to-one onto the git subcommands the release workflow
/// needs; implementations report failed invocations as
/// [crate::error::ReleaseError::Command] with the offending command line.
pub trait SourceControl {
    /// Name of the currently checked-out branch.
    fn current_branch(&self) -> Result<String>;

    /// Whether the current branch tracks an upstream.
    fn has_upstream(&self) -> Result<bool>;

    /// Fetch from the remote. Callers treat failures as non-fatal.
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Behind/ahead commit counts relative to the upstream.
    fn divergence(&self) -> Result<Divergence>;

    /// Fast-forward pull from the upstream.
    fn pull_fast_forward(&self) -> Result<()>;

    /// Most recent tag reachable from HEAD, if any tag exists.
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Whether a tag with exactly this name exists.
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD with its name as the message.
    fn create_annotated_tag(&self, name: &str) -> Result<()>;

    /// True if either the working tree or the index differs from HEAD.
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Stage all changes.
    fn stage_all(&self) -> Result<()>;

    /// Stage a single path.
    fn stage(&self, path: &str) -> Result<()>;

    /// Commit whatever is staged.
    fn commit(&self, message: &str) -> Result<()>;

    /// Plain push to the configured upstream.
    fn push(&self) -> Result<()>;

    /// Push while establishing upstream tracking on the current branch.
    fn push_set_upstream(&self, remote: &str) -> Result<()>;

    /// Push commits and tags for the current branch together.
    fn push_follow_tags(&self, remote: &str) -> Result<()>;

    /// Non-merge commit subjects since the given tag (exclusive), or since
    /// the repository's first commit when no tag is given, in log order.
    fn subjects_since(&self, last_tag: Option<&str>) -> Result<Vec<String>>;
}
