//! Release host backend driving the `gh` CLI.

use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::host::ReleaseHost;
use crate::process;

/// [ReleaseHost] implementation that shells out to `gh release`.
#[derive(Debug, Default)]
pub struct GhCli;

impl GhCli {
    pub fn new() -> Self {
        GhCli
    }
}

fn notes_file_arg(notes_file: &Path) -> Result<&str> {
    notes_file.to_str().ok_or_else(|| {
        ReleaseError::host(format!(
            "Notes file path is not valid UTF-8: {}",
            notes_file.display()
        ))
    })
}

impl ReleaseHost for GhCli {
    fn release_exists(&self, tag: &str) -> Result<bool> {
        let probe = process::run_query("gh", &["release", "view", tag])?;
        if probe.success {
            return Ok(true);
        }
        // gh reports a missing release on stderr; anything else is a real
        // failure (auth, network, no repo) and must propagate
        if probe.stderr.to_lowercase().contains("not found") {
            Ok(false)
        } else {
            Err(ReleaseError::Command {
                command: process::render_command("gh", &["release", "view", tag]),
                code: probe.code,
            })
        }
    }

    fn create_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()> {
        let notes = notes_file_arg(notes_file)?;
        process::run(
            "gh",
            &[
                "release",
                "create",
                tag,
                "--title",
                title,
                "--notes-file",
                notes,
            ],
        )
    }

    fn update_release(&self, tag: &str, title: &str, notes_file: &Path) -> Result<()> {
        let notes = notes_file_arg(notes_file)?;
        process::run(
            "gh",
            &[
                "release",
                "edit",
                tag,
                "--title",
                title,
                "--notes-file",
                notes,
            ],
        )
    }
}
