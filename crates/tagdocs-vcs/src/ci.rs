//! CI environment preparation.

use std::env;
use std::path::Path;

use crate::command::{CommandError, run_captured};

fn env_truthy(name: &str) -> bool {
    env::var(name).is_ok_and(|value| !value.is_empty())
}

/// Configure the git identity when running under GitHub Actions.
///
/// Checked-out workspaces are owned by a different user than the job, so
/// the workspace must be marked safe before any repository-local command
/// works. Commits on the publishing branch need a name and email, derived
/// from the acting user. Outside of Actions this is a no-op.
pub fn setup_ci_identity(workspace: &Path) -> Result<(), CommandError> {
    if !env_truthy("CI") || !env_truthy("GITHUB_ACTIONS") {
        return Ok(());
    }

    let actor = env::var("GITHUB_ACTOR").unwrap_or_else(|_| "github-actions".to_owned());

    run_captured(
        "git",
        &[
            "config",
            "--global",
            "--add",
            "safe.directory",
            &workspace.to_string_lossy(),
        ],
        None,
    )?;
    run_captured("git", &["config", "--global", "user.name", &actor], None)?;
    run_captured(
        "git",
        &[
            "config",
            "--global",
            "user.email",
            &format!("{actor}@users.noreply.github.com"),
        ],
        None,
    )?;

    Ok(())
}
