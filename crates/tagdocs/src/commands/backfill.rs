//! `tagdocs backfill` command implementation.
//!
//! Rebuilds the documentation history of a repository: clones it into a
//! temporary directory, generates docs for every version tag in ascending
//! order through the containerized action, previews the result locally,
//! and pushes the publishing branch only after confirmation.

use std::env;

use clap::Args;
use tagdocs_publish::{Mike, PUBLISH_BRANCH};
use tagdocs_vcs::{Git, run_tool};
use tagdocs_version::{OpaqueRank, VersionTag, sort_key};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the backfill command.
#[derive(Args)]
pub(crate) struct BackfillArgs {
    /// Repository URL of the form `git@github.com:org/repo.git`.
    repo_url: String,

    /// Container image that generates the documentation for one tag.
    #[arg(long, default_value = "tagdocs-action")]
    image: String,
}

impl BackfillArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let repo = org_repo(&self.repo_url).ok_or_else(|| {
            CliError::Validation(format!(
                "{} doesn't match the form `git@github.com:org/repo.git`",
                self.repo_url
            ))
        })?;

        let clone_dir = tempfile::tempdir()?;
        output.info(&format!(
            "Cloning repository into {} ...",
            clone_dir.path().display()
        ));
        let git = Git::clone_recursive(&self.repo_url, clone_dir.path())?;

        let mut tags: Vec<String> = git
            .tags()?
            .into_iter()
            .filter(|tag| VersionTag::parse(tag).is_some())
            .collect();
        tags.sort_by_key(|tag| sort_key(tag, OpaqueRank::Low));

        for tag in &tags {
            output.info(&format!("Generating docs for tag `{tag}`"));
            git.checkout(tag)?;
            git.clean_force()?;
            git.submodule_update()?;
            self.run_container(&git, &repo, tag)?;
        }

        let mike = Mike::new(git.workdir());
        let mut server = mike.serve()?;

        output.info("Updated documentation at http://localhost:8000/");
        let push = output.confirm("Push these docs live");

        output.info("Stopping server...");
        let _ = server.kill();
        let _ = server.wait();

        if push {
            git.push("origin", PUBLISH_BRANCH)?;
            output.success("Docs pushed");
        } else {
            output.info("Not pushing docs");
        }

        Ok(())
    }

    /// Generate the documentation commit for one tag inside the container.
    fn run_container(&self, git: &Git, repo: &str, tag: &str) -> Result<(), CliError> {
        let workdir = git.workdir().to_string_lossy();
        let mount = format!("{workdir}:{workdir}");
        let actor = env::var("USER").unwrap_or_else(|_| "tagdocs".to_owned());

        run_tool(
            "docker",
            &[
                "run",
                "-v",
                &mount,
                "-e",
                &format!("GITHUB_REPOSITORY={repo}"),
                "-e",
                &format!("GITHUB_WORKSPACE={workdir}"),
                "-e",
                &format!("GITHUB_SHA={tag}"),
                "-e",
                "BACKFILL_TAGS=1",
                "-e",
                "CI=1",
                "-e",
                "GITHUB_ACTIONS=1",
                "-e",
                &format!("GITHUB_ACTOR={actor}"),
                "-w",
                &workdir,
                "--rm",
                &self.image,
            ],
            None,
        )?;

        Ok(())
    }
}

/// Extract `org/repo` from an SSH clone URL.
fn org_repo(url: &str) -> Option<String> {
    url.strip_prefix("git@github.com:")?
        .strip_suffix(".git")
        .map(ToOwned::to_owned)
}
