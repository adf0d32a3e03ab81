//! Subprocess glue for the external CLIs this tool delegates to.
//!
//! Every helper reports failures as [ReleaseError::Command] carrying the
//! shell-quoted command line and the tool's exit code, so the top level can
//! print exactly what failed and exit with the delegated code.

use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{ReleaseError, Result};

/// Captured outcome of a subprocess that is allowed to fail.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Render a command line with shell-safe quoting for error reports.
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = vec![quote(program)];
    rendered.extend(args.iter().map(|a| quote(a)));
    rendered.join(" ")
}

fn quote(word: &str) -> String {
    let needs_quoting = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || "\"'`$\\!*?[](){}<>|&;#~".contains(c));
    if needs_quoting {
        format!("'{}'", word.replace('\'', r"'\''"))
    } else {
        word.to_string()
    }
}

fn command_error(program: &str, args: &[&str], code: Option<i32>) -> ReleaseError {
    ReleaseError::Command {
        command: render_command(program, args),
        code,
    }
}

/// Run a command with inherited stdio, failing on non-zero exit.
pub fn run(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|_| command_error(program, args, None))?;

    if status.success() {
        Ok(())
    } else {
        Err(command_error(program, args, status.code()))
    }
}

/// Run a command and capture its trimmed stdout, failing on non-zero exit.
pub fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|_| command_error(program, args, None))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(command_error(program, args, output.status.code()))
    }
}

/// Run a command quietly, reporting its outcome instead of failing.
///
/// Used for probes (does a release exist, is an upstream configured)
/// where a non-zero exit is an answer, not an error.
pub fn run_query(program: &str, args: &[&str]) -> Result<CommandOutput> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|_| command_error(program, args, None))?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Check whether an executable is resolvable on PATH.
pub fn tool_on_path(name: &str) -> bool {
    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
