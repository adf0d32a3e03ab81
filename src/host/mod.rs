//! Release-hosting abstraction layer.
//!
//! A release object lives on the remote hosting service, keyed by tag name,
//! with a title and a notes body. The workflow only needs three operations,
//! captured by [ReleaseHost]:
//!
//! - [gh::GhCli]: drives the `gh` CLI
//! - [mock::MockHost]: in-memory implementation for testing

pub mod gh;
pub mod mock;

pub use gh::GhCli;
pub use mock::MockHost;

use std::path::Path;

use crate::error::Result;

/// Narrow capability interface over the release-hosting CLI.
pub trait ReleaseHost {
    /// Whether a release object exists for the tag.
    ///
    /// "Not found" is a soft `false`; any other failure of the underlying
    /// query propagates as an error.
    fn release_exists(&self, tag: &str) -> Result<bool>;

    /// Create a release for the tag with a title and a notes file.
    fn create_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()>;

    /// Update an existing release's title and notes in place.
    fn update_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()>;
}
