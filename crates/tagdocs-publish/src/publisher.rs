//! End-to-end publish orchestration.

use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tagdocs_site::{SiteOptions, build_site, inherited_config};
use tagdocs_vcs::{Git, setup_ci_identity};
use tagdocs_version::{AliasAssignment, CommitInfo, LATEST, VersionTag, plan_assignments};

use crate::PublishError;
use crate::mike::Mike;

/// Branch the external publisher commits rendered sites to.
pub const PUBLISH_BRANCH: &str = "gh-pages";

/// Inputs for one publish run.
#[derive(Clone, Debug)]
pub struct PublishOptions<'a> {
    /// Repository root directory.
    pub workspace: &'a Path,
    /// Repository name in `org/repo` form.
    pub repo: &'a str,
    /// Path of the README, relative to the workspace.
    pub readme: &'a Path,
    /// Optional user configuration, relative to the workspace.
    pub user_config: Option<&'a Path>,
    /// Commit or ref the generated source links point at.
    pub commit: &'a str,
    /// Fetch and push the publishing branch. Disabled when backfilling.
    pub remote_actions: bool,
}

/// What a publish run did.
#[derive(Clone, Debug)]
pub struct PublishSummary {
    /// Assignments handed to the publisher, in deployment order.
    pub deployed: Vec<AliasAssignment>,
    /// Non-fatal problems from the site build (broken anchor links).
    pub warnings: Vec<String>,
    /// Path of the generated configuration file.
    pub config_path: PathBuf,
}

/// Build the site and deploy every version/alias assignment the current
/// commit earns.
///
/// Re-running against a commit that is fully published rebuilds the pages
/// (splitting is pure and safe to overwrite) but deploys nothing new.
pub fn publish(options: &PublishOptions<'_>) -> Result<PublishSummary, PublishError> {
    let git = Git::new(options.workspace);

    setup_ci_identity(options.workspace)?;

    if options.remote_actions {
        // The publishing branch may not exist on the very first run.
        git.fetch_branch_shallow("origin", PUBLISH_BRANCH);
        git.fetch_tags()?;
    }

    let built = build_site(&SiteOptions {
        repo_dir: options.workspace,
        repo: options.repo,
        readme: options.readme,
        user_config: options.user_config,
        commit: options.commit,
    })?;

    let head = CommitInfo {
        commit: git.head_commit()?,
        date: git.head_commit_date()?,
    };
    let tags = git.tags_at_head()?;

    let mike = Mike::new(options.workspace);
    let registry = mike.list()?;
    let plan = plan_assignments(&tags, &head, &registry, &git);

    for assignment in &plan {
        tracing::info!(version = %assignment.version, aliases = ?assignment.aliases, "deploying");

        if VersionTag::parse(&assignment.version).is_some() {
            // Tagged versions get repo and edit links pinned at the tag.
            let overrides = version_overrides(options.repo, &assignment.version, options.readme);
            let inherited = inherited_config(&built.config_path, &overrides)?;
            mike.deploy(inherited.path(), assignment)?;
        } else {
            mike.deploy(&built.config_path, assignment)?;
        }
    }

    // A no-op after the very first deployment, and harmless thereafter.
    mike.set_default(&built.config_path, LATEST)?;

    if options.remote_actions {
        git.push("origin", PUBLISH_BRANCH)?;
    }

    Ok(PublishSummary {
        deployed: plan,
        warnings: built.warnings,
        config_path: built.config_path,
    })
}

/// Overrides pinning repository and edit links at a tag instead of a commit.
fn version_overrides(repo: &str, version: &str, readme: &Path) -> Mapping {
    let base = format!("https://github.com/{repo}");
    let readme = readme.to_string_lossy();

    let mut overrides = Mapping::new();
    overrides.insert("repo_url".into(), format!("{base}/tree/{version}").into());
    overrides.insert(
        "edit_uri_template".into(),
        format!("{base}/blob/{version}/{readme}").into(),
    );
    overrides
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    use super::*;

    #[test]
    fn test_version_overrides_pin_the_tag() {
        let overrides = version_overrides("acme/widgets", "v1.2.0", Path::new("README.md"));

        assert_eq!(
            overrides.get("repo_url").and_then(Value::as_str),
            Some("https://github.com/acme/widgets/tree/v1.2.0")
        );
        assert_eq!(
            overrides.get("edit_uri_template").and_then(Value::as_str),
            Some("https://github.com/acme/widgets/blob/v1.2.0/README.md")
        );
    }
}
