//! `tagdocs publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use tagdocs_publish::{PublishOptions, publish};

use crate::commands::{effective_config, env_truthy};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Repository root (GITHUB_WORKSPACE under Actions).
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Repository name in `org/repo` form (GITHUB_REPOSITORY under Actions).
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: String,

    /// Commit that generated source links point at (GITHUB_SHA under Actions).
    #[arg(long, env = "GITHUB_SHA", default_value = "main")]
    commit: String,

    /// Additional MkDocs configuration file, relative to the workspace.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path of the README file, relative to the workspace.
    #[arg(long, default_value = "README.md")]
    readme: PathBuf,

    /// Skip fetching and pushing the publishing branch.
    #[arg(long)]
    no_remote: bool,
}

impl PublishArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Backfill runs operate on a detached local clone and must not
        // touch the remote.
        let remote_actions = !self.no_remote && !env_truthy("BACKFILL_TAGS");

        let summary = publish(&PublishOptions {
            workspace: &self.workspace,
            repo: &self.repo,
            readme: &self.readme,
            user_config: effective_config(self.config.as_deref()),
            commit: &self.commit,
            remote_actions,
        })?;

        for warning in &summary.warnings {
            output.annotation("Broken Link", warning);
            output.warning(warning);
        }

        if summary.deployed.is_empty() {
            output.info("Nothing new to deploy");
        } else {
            for assignment in &summary.deployed {
                let aliases: Vec<&str> =
                    assignment.aliases.iter().map(String::as_str).collect();
                output.success(&format!(
                    "Deployed {} [{}]",
                    assignment.version,
                    aliases.join(", ")
                ));
            }
        }

        Ok(())
    }
}
