//! In-memory source control for testing the workflow without subprocesses.

use std::cell::RefCell;

use crate::error::{ReleaseError, Result};
use crate::git::{Divergence, SourceControl};

/// What a fast-forward pull does to the mock's divergence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastForward {
    /// Pull succeeds and catches the branch up
    CatchesUp,
    /// Pull succeeds but the branch stays behind
    StaysBehind,
    /// Pull itself fails
    Fails,
}

#[derive(Debug)]
struct MockState {
    branch: String,
    upstream: bool,
    divergence: Divergence,
    fast_forward: FastForward,
    tags: Vec<String>,
    subjects: Vec<String>,
    dirty: bool,
    commits: Vec<String>,
    staged: Vec<String>,
    pushes: Vec<String>,
    fetches: usize,
    ff_pulls: usize,
}

/// Mock repository with scriptable state and recorded operations.
pub struct MockGit {
    state: RefCell<MockState>,
}

impl MockGit {
    /// A clean repository on `master` with an up-to-date upstream.
    pub fn new() -> Self {
        MockGit {
            state: RefCell::new(MockState {
                branch: "master".to_string(),
                upstream: true,
                divergence: Divergence::default(),
                fast_forward: FastForward::CatchesUp,
                tags: Vec::new(),
                subjects: Vec::new(),
                dirty: false,
                commits: Vec::new(),
                staged: Vec::new(),
                pushes: Vec::new(),
                fetches: 0,
                ff_pulls: 0,
            }),
        }
    }

    pub fn set_branch(&self, branch: impl Into<String>) {
        self.state.borrow_mut().branch = branch.into();
    }

    pub fn set_upstream(&self, upstream: bool) {
        self.state.borrow_mut().upstream = upstream;
    }

    pub fn set_divergence(&self, behind: usize, ahead: usize) {
        self.state.borrow_mut().divergence = Divergence { behind, ahead };
    }

    pub fn set_fast_forward(&self, behavior: FastForward) {
        self.state.borrow_mut().fast_forward = behavior;
    }

    pub fn add_tag(&self, name: impl Into<String>) {
        self.state.borrow_mut().tags.push(name.into());
    }

    pub fn set_subjects(&self, subjects: &[&str]) {
        self.state.borrow_mut().subjects = subjects.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.borrow_mut().dirty = dirty;
    }

    /// Messages of commits made during the run, in order.
    pub fn commit_messages(&self) -> Vec<String> {
        self.state.borrow().commits.clone()
    }

    /// Push invocations recorded during the run.
    pub fn pushes(&self) -> Vec<String> {
        self.state.borrow().pushes.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.state.borrow().tags.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.borrow().fetches
    }

    pub fn fast_forward_count(&self) -> usize {
        self.state.borrow().ff_pulls
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceControl for MockGit {
    fn current_branch(&self) -> Result<String> {
        Ok(self.state.borrow().branch.clone())
    }

    fn has_upstream(&self) -> Result<bool> {
        Ok(self.state.borrow().upstream)
    }

    fn fetch(&self, _remote: &str) -> Result<()> {
        self.state.borrow_mut().fetches += 1;
        Ok(())
    }

    fn divergence(&self) -> Result<Divergence> {
        Ok(self.state.borrow().divergence)
    }

    fn pull_fast_forward(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ff_pulls += 1;
        match state.fast_forward {
            FastForward::CatchesUp => {
                state.divergence.behind = 0;
                Ok(())
            }
            FastForward::StaysBehind => Ok(()),
            FastForward::Fails => Err(ReleaseError::Command {
                command: "git pull --ff-only".to_string(),
                code: Some(1),
            }),
        }
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.state.borrow().tags.last().cloned())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().tags.iter().any(|t| t == name))
    }

    fn create_annotated_tag(&self, name: &str) -> Result<()> {
        self.state.borrow_mut().tags.push(name.to_string());
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.state.borrow().dirty)
    }

    fn stage_all(&self) -> Result<()> {
        self.state.borrow_mut().staged.push("-A".to_string());
        Ok(())
    }

    fn stage(&self, path: &str) -> Result<()> {
        self.state.borrow_mut().staged.push(path.to_string());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.commits.push(message.to_string());
        state.dirty = false;
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.state.borrow_mut().pushes.push("push".to_string());
        Ok(())
    }

    fn push_set_upstream(&self, remote: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .pushes
            .push(format!("push -u {} HEAD", remote));
        Ok(())
    }

    fn push_follow_tags(&self, remote: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .pushes
            .push(format!("push --follow-tags {} HEAD", remote));
        Ok(())
    }

    fn subjects_since(&self, _last_tag: Option<&str>) -> Result<Vec<String>> {
        Ok(self.state.borrow().subjects.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_defaults() {
        let git = MockGit::new();
        assert_eq!(git.current_branch().unwrap(), "master");
        assert!(git.has_upstream().unwrap());
        assert!(!git.has_uncommitted_changes().unwrap());
        assert_eq!(git.latest_tag().unwrap(), None);
    }

    #[test]
    fn test_mock_tags() {
        let git = MockGit::new();
        git.add_tag("v1.0.0");
        assert_eq!(git.latest_tag().unwrap(), Some("v1.0.0".to_string()));
        assert!(git.tag_exists("v1.0.0").unwrap());
        assert!(!git.tag_exists("v2.0.0").unwrap());
    }

    #[test]
    fn test_mock_commit_clears_dirty() {
        let git = MockGit::new();
        git.set_dirty(true);
        git.commit("chore: prepare release v1.0.0").unwrap();
        assert!(!git.has_uncommitted_changes().unwrap());
        assert_eq!(git.commit_messages(), vec!["chore: prepare release v1.0.0"]);
    }

    #[test]
    fn test_mock_fast_forward_catches_up() {
        let git = MockGit::new();
        git.set_divergence(2, 0);
        git.pull_fast_forward().unwrap();
        assert_eq!(git.divergence().unwrap().behind, 0);
        assert_eq!(git.fast_forward_count(), 1);
    }

    #[test]
    fn test_mock_fast_forward_stays_behind() {
        let git = MockGit::new();
        git.set_divergence(2, 0);
        git.set_fast_forward(FastForward::StaysBehind);
        git.pull_fast_forward().unwrap();
        assert_eq!(git.divergence().unwrap().behind, 2);
    }
}
