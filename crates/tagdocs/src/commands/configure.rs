//! `tagdocs configure` command implementation.

use std::path::PathBuf;

use clap::Args;
use tagdocs_site::{SiteOptions, build_site};

use crate::commands::effective_config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the configure command.
#[derive(Args)]
pub(crate) struct ConfigureArgs {
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
}

impl ConfigureArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let built = build_site(&SiteOptions {
            repo_dir: &self.workspace,
            repo: &self.repo,
            readme: &self.readme,
            user_config: effective_config(self.config.as_deref()),
            commit: &self.commit,
        })?;

        for warning in &built.warnings {
            output.annotation("Broken Link", warning);
            output.warning(warning);
        }

        output.success(&format!(
            "Wrote {} with {} page(s)",
            built.config_path.display(),
            built.nav.len()
        ));

        Ok(())
    }
}
