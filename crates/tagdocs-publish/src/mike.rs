//! Thin wrapper over the `mike` versioned-docs publisher.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tagdocs_vcs::{CommandError, run_tool};
use tagdocs_version::{AliasAssignment, VersionRegistry};

use crate::PublishError;

/// The external publisher, driven through its command-line interface.
///
/// Calls are synchronous and atomic; a failing invocation aborts with its
/// captured output attached. All registry writes go through here — the
/// rest of the pipeline only ever reads.
#[derive(Clone, Debug)]
pub struct Mike {
    workdir: PathBuf,
}

impl Mike {
    /// Drive the publisher inside a repository working directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Fetch the registry of currently documented versions.
    pub fn list(&self) -> Result<VersionRegistry, PublishError> {
        let json = run_tool("mike", &["list", "--json"], Some(&self.workdir))?;
        Ok(VersionRegistry::from_json(&json)?)
    }

    /// Deploy one version, updating its aliases and recording properties.
    ///
    /// Builds the docs as a commit on the publishing branch; nothing is
    /// pushed here.
    pub fn deploy(&self, config: &Path, assignment: &AliasAssignment) -> Result<(), PublishError> {
        let args = deploy_args(config, assignment)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_tool("mike", &args, Some(&self.workdir))?;
        Ok(())
    }

    /// Redirect the site root to an alias.
    pub fn set_default(&self, config: &Path, alias: &str) -> Result<(), PublishError> {
        let config = config.to_string_lossy();
        run_tool(
            "mike",
            &["set-default", "--config-file", config.as_ref(), alias],
            Some(&self.workdir),
        )?;
        Ok(())
    }

    /// Serve the published documentation locally, as a child process.
    ///
    /// Used for the backfill preview; the caller owns the child and must
    /// terminate it.
    pub fn serve(&self) -> Result<Child, PublishError> {
        Command::new("mike")
            .arg("serve")
            .current_dir(&self.workdir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| {
                PublishError::Command(CommandError::Spawn {
                    command: "mike serve".to_owned(),
                    source,
                })
            })
    }
}

/// Argument list for one deploy invocation.
fn deploy_args(
    config: &Path,
    assignment: &AliasAssignment,
) -> Result<Vec<String>, serde_json::Error> {
    let mut args = vec![
        "deploy".to_owned(),
        "--config-file".to_owned(),
        config.to_string_lossy().into_owned(),
        "--prop-set-all".to_owned(),
        serde_json::to_string(&assignment.props)?,
    ];

    if assignment.aliases.is_empty() {
        args.push(assignment.version.clone());
    } else {
        args.push("--update-aliases".to_owned());
        args.push(assignment.version.clone());
        args.extend(assignment.aliases.iter().cloned());
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use tagdocs_version::CommitInfo;

    use super::*;

    fn assignment(version: &str, aliases: &[&str]) -> AliasAssignment {
        AliasAssignment {
            version: version.to_owned(),
            aliases: aliases
                .iter()
                .map(|alias| (*alias).to_owned())
                .collect::<BTreeSet<_>>(),
            props: CommitInfo {
                commit: "abc".to_owned(),
                date: "2024-03-01T10:00:00+00:00".to_owned(),
            },
        }
    }

    #[test]
    fn test_deploy_args_with_aliases() {
        let args = deploy_args(
            Path::new("mkdocs.yml"),
            &assignment("v1.0.0", &["latest", "release-candidate"]),
        )
        .unwrap();

        assert_eq!(
            args,
            vec![
                "deploy",
                "--config-file",
                "mkdocs.yml",
                "--prop-set-all",
                r#"{"commit":"abc","date":"2024-03-01T10:00:00+00:00"}"#,
                "--update-aliases",
                "v1.0.0",
                "latest",
                "release-candidate",
            ]
        );
    }

    #[test]
    fn test_deploy_args_without_aliases() {
        let args = deploy_args(Path::new("mkdocs.yml"), &assignment("v0.9.0", &[])).unwrap();

        assert_eq!(
            args,
            vec![
                "deploy",
                "--config-file",
                "mkdocs.yml",
                "--prop-set-all",
                r#"{"commit":"abc","date":"2024-03-01T10:00:00+00:00"}"#,
                "v0.9.0",
            ]
        );
    }
}
