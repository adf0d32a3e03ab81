//! In-memory release host for testing the publish step.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::host::ReleaseHost;

/// A release object as the mock host stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRelease {
    pub title: String,
    pub notes: String,
}

/// Mock release host keyed by tag name.
///
/// Reads the notes file on create/update so tests can assert on the exact
/// notes text that would have been published.
pub struct MockHost {
    releases: RefCell<HashMap<String, StoredRelease>>,
    fail_query: RefCell<bool>,
}

impl MockHost {
    pub fn new() -> Self {
        MockHost {
            releases: RefCell::new(HashMap::new()),
            fail_query: RefCell::new(false),
        }
    }

    /// Seed an existing release.
    pub fn add_release(&self, tag: impl Into<String>, title: impl Into<String>, notes: impl Into<String>) {
        self.releases.borrow_mut().insert(
            tag.into(),
            StoredRelease {
                title: title.into(),
                notes: notes.into(),
            },
        );
    }

    /// Make the existence query fail with a non-"not found" error.
    pub fn fail_queries(&self) {
        *self.fail_query.borrow_mut() = true;
    }

    pub fn release(&self, tag: &str) -> Option<StoredRelease> {
        self.releases.borrow().get(tag).cloned()
    }

    pub fn release_count(&self) -> usize {
        self.releases.borrow().len()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseHost for MockHost {
    fn release_exists(&self, tag: &str) -> Result<bool> {
        if *self.fail_query.borrow() {
            return Err(ReleaseError::host("service unavailable"));
        }
        Ok(self.releases.borrow().contains_key(tag))
    }

    fn create_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()> {
        if self.releases.borrow().contains_key(tag) {
            return Err(ReleaseError::host(format!(
                "release for '{}' already exists",
                tag
            )));
        }
        let notes = fs::read_to_string(notes_file)?;
        self.add_release(tag, title, notes);
        Ok(())
    }

    fn update_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()> {
        if !self.releases.borrow().contains_key(tag) {
            return Err(ReleaseError::host(format!("release for '{}' not found", tag)));
        }
        let notes = fs::read_to_string(notes_file)?;
        self.add_release(tag, title, notes);
        Ok(())
    }
}
