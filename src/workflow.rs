//! The release workflow: a strictly sequential run over repository state.
//!
//! Each step is a precondition for the next: preflight, version resolution,
//! outstanding-changes commit, changelog commit, branch push, tag and tag
//! push, release publication. Any failure halts the run; commits and tags
//! already created are intentionally left in place for manual inspection.
//!
//! The workflow only touches the outside world through the
//! [SourceControl] and [ReleaseHost] capabilities and the injected
//! [BumpChooser], so the whole sequence is testable against mocks.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::changelog;
use crate::config::ReleaseOptions;
use crate::error::{ReleaseError, Result};
use crate::git::SourceControl;
use crate::host::ReleaseHost;
use crate::preflight;
use crate::ui::{self, BumpChooser};
use crate::version::Version;

/// Result of a completed release run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Version the repository was at before the run
    pub previous_version: String,

    /// Version that was released
    pub version: Version,

    /// Tag created for the release
    pub tag: String,

    /// True if the release object was created, false if updated in place
    pub release_created: bool,
}

/// Release orchestrator over injected capabilities.
pub struct ReleaseWorkflow<'a> {
    git: &'a dyn SourceControl,
    host: &'a dyn ReleaseHost,
    chooser: &'a mut dyn BumpChooser,
    options: ReleaseOptions,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(
        git: &'a dyn SourceControl,
        host: &'a dyn ReleaseHost,
        chooser: &'a mut dyn BumpChooser,
        options: ReleaseOptions,
    ) -> Self {
        ReleaseWorkflow {
            git,
            host,
            chooser,
            options,
        }
    }

    /// Run the whole release sequence.
    pub fn run(&mut self) -> Result<WorkflowResult> {
        preflight::ensure_branch_state(self.git, &self.options.branch, &self.options.remote)?;

        let last_tag = self.git.latest_tag()?;
        let current = self.current_version(last_tag.as_deref())?;
        let version = self.resolve_new_version(&current)?;
        ui::display_version_plan(&current, &version.to_string());

        let tag = version.tag_name();

        // Outstanding work rides along under a maintenance message that the
        // note filter will drop on the next release
        self.commit_all(&format!("chore: prepare release {}", tag))?;

        self.write_and_commit_changelog(&version, last_tag.as_deref())?;

        self.push_branch()?;

        if self.git.tag_exists(&tag)? {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists.", tag)));
        }
        self.git.create_annotated_tag(&tag)?;
        self.git.push_follow_tags(&self.options.remote)?;

        let release_created = self.upsert_release(&version)?;

        Ok(WorkflowResult {
            previous_version: current,
            version,
            tag,
            release_created,
        })
    }

    /// Current version string: latest tag, else newest changelog section,
    /// else `0.0.0`. Never fails.
    fn current_version(&self, last_tag: Option<&str>) -> Result<String> {
        if let Some(tag) = last_tag {
            return Ok(tag.strip_prefix('v').unwrap_or(tag).to_string());
        }

        let fallback = changelog::Changelog::load(&self.options.changelog_path)
            .ok()
            .and_then(|c| c.latest_version());
        Ok(fallback.unwrap_or_else(|| "0.0.0".to_string()))
    }

    /// New version: explicit override verbatim, otherwise the chosen bump
    /// applied to the current version.
    fn resolve_new_version(&mut self, current: &str) -> Result<Version> {
        if let Some(version) = self.options.explicit_version {
            return Ok(version);
        }

        let bump = match self.options.bump {
            Some(bump) => bump,
            None => self.chooser.choose_bump()?,
        };

        let current = Version::parse(current).map_err(|_| {
            ReleaseError::version(format!(
                "Cannot parse current version '{}' as SemVer",
                current
            ))
        })?;
        Ok(current.bump(&bump))
    }

    /// Stage and commit everything, but only when something changed;
    /// committing a clean tree is a no-op, not an error.
    fn commit_all(&self, message: &str) -> Result<()> {
        if self.git.has_uncommitted_changes()? {
            self.git.stage_all()?;
            self.git.commit(message)?;
        }
        Ok(())
    }

    fn write_and_commit_changelog(&self, version: &Version, last_tag: Option<&str>) -> Result<()> {
        let subjects = self.git.subjects_since(last_tag)?;
        let notes = changelog::notes_from_subjects(&subjects)?;
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        changelog::update_changelog(
            &self.options.changelog_path,
            &version.to_string(),
            &date,
            &notes,
        )?;

        self.git
            .stage(&self.options.changelog_path.to_string_lossy())?;
        self.git.commit(&format!("docs(changelog): {}", version))
    }

    fn push_branch(&self) -> Result<()> {
        if self.git.has_upstream()? {
            self.git.push()
        } else {
            self.git.push_set_upstream(&self.options.remote)
        }
    }

    /// Create or update the release object for the version's tag.
    ///
    /// Notes go through a scoped temporary file to avoid command-line
    /// quoting hazards; the file is removed on every exit path when it
    /// drops. Returns true when a new release was created.
    fn upsert_release(&self, version: &Version) -> Result<bool> {
        let tag = version.tag_name();
        let extracted =
            changelog::extract_release_notes(&self.options.changelog_path, &version.to_string())?;
        let notes = if extracted.is_empty() {
            format!("Release {}", version)
        } else {
            extracted
        };

        let mut notes_file = NamedTempFile::new()?;
        notes_file.write_all(notes.as_bytes())?;
        notes_file.flush()?;

        if self.host.release_exists(&tag)? {
            self.host.update_release(&tag, &tag, notes_file.path())?;
            Ok(false)
        } else {
            self.host.create_release(&tag, &tag, notes_file.path())?;
            Ok(true)
        }
    }
}
