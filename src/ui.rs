//! Console output and user interaction.
//!
//! The bump prompt is modelled as a capability ([BumpChooser]) with an
//! interactive implementation reading from any input stream and a fixed
//! non-interactive default, so the workflow can be tested deterministically
//! without a terminal.

use std::io::{self, BufRead, Write};

use console::style;

use crate::error::{ReleaseError, Result};
use crate::version::VersionBump;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show the version transition the run is about to perform.
pub fn display_version_plan(current: &str, new: &str) {
    println!("Current version: {}", style(current).red());
    println!("New version:     {}", style(new).green());
}

/// Decides the bump kind when neither `BUMP` nor a CLI flag supplied one.
pub trait BumpChooser {
    fn choose_bump(&mut self) -> Result<VersionBump>;
}

/// Interactive chooser reading a single-character choice from an input
/// stream. Empty input defaults to patch; unrecognized input is fatal.
pub struct BumpPrompt<R: BufRead> {
    input: R,
}

impl<R: BufRead> BumpPrompt<R> {
    pub fn new(input: R) -> Self {
        BumpPrompt { input }
    }
}

impl<R: BufRead> BumpChooser for BumpPrompt<R> {
    fn choose_bump(&mut self) -> Result<VersionBump> {
        println!("Select version bump: [m]ajor / mi[n]or / [p]atch (default)");
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        match line.trim().to_lowercase().as_str() {
            "m" | "major" => Ok(VersionBump::Major),
            "n" | "minor" => Ok(VersionBump::Minor),
            "" | "p" | "patch" => Ok(VersionBump::Patch),
            other => Err(ReleaseError::version(format!("Unknown choice '{}'", other))),
        }
    }
}

/// Non-interactive chooser returning a fixed default.
pub struct NonInteractive {
    default: VersionBump,
}

impl NonInteractive {
    pub fn new(default: VersionBump) -> Self {
        NonInteractive { default }
    }

    /// The default for detached sessions: patch.
    pub fn patch() -> Self {
        NonInteractive::new(VersionBump::Patch)
    }
}

impl BumpChooser for NonInteractive {
    fn choose_bump(&mut self) -> Result<VersionBump> {
        Ok(self.default)
    }
}
