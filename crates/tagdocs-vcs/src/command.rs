//! Captured-output process execution.

use std::path::Path;
use std::process::Command;

/// Failure of an external tool invocation.
///
/// Carries the failing command line and its captured output so the run can
/// abort with a diagnostic that identifies what was being attempted.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The process could not be started at all.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Rendered command line.
        command: String,
        /// Underlying launch failure.
        #[source]
        source: std::io::Error,
    },
    /// The process ran and exited unsuccessfully.
    #[error("`{command}` failed ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    Failed {
        /// Rendered command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Render a command line for diagnostics.
pub(crate) fn render(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Run a command to completion, capturing output.
///
/// Returns the captured stdout on success; a non-zero exit becomes a
/// [`CommandError::Failed`] with both streams attached.
pub(crate) fn run_captured(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<String, CommandError> {
    let rendered = render(program, args);
    tracing::debug!(command = %rendered, "running");

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| CommandError::Spawn {
        command: rendered.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(CommandError::Failed {
            command: rendered,
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command to completion, reporting only whether it exited zero.
///
/// Output is swallowed; only a failure to launch is an error.
pub(crate) fn run_status(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<bool, CommandError> {
    let rendered = render(program, args);
    tracing::debug!(command = %rendered, "running");

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|source| CommandError::Spawn {
        command: rendered,
        source,
    })?;

    Ok(output.status.success())
}
