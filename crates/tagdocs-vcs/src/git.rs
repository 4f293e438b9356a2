//! Thin wrapper over the `git` command-line tool.

use std::path::{Path, PathBuf};

use tagdocs_version::History;

use crate::command::{CommandError, run_captured, run_status};

/// A repository working directory driven through the `git` binary.
///
/// Every call is a synchronous, atomic process invocation: it either
/// succeeds or surfaces a [`CommandError`] with the captured output
/// attached.
#[derive(Clone, Debug)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    /// Wrap an existing working directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Clone a repository with its submodules into `dest`.
    pub fn clone_recursive(url: &str, dest: &Path) -> Result<Self, CommandError> {
        run_captured(
            "git",
            &["clone", "--recurse-submodules", url, &dest.to_string_lossy()],
            None,
        )?;
        Ok(Self::new(dest))
    }

    /// The working directory this wrapper operates in.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        run_captured("git", args, Some(&self.workdir))
    }

    /// Full hash of the current commit.
    pub fn head_commit(&self) -> Result<String, CommandError> {
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_owned())
    }

    /// Committer date of the current commit, strict ISO-8601.
    pub fn head_commit_date(&self) -> Result<String, CommandError> {
        Ok(self
            .run(&["show", "HEAD", "--format=%cI", "--no-patch"])?
            .trim()
            .to_owned())
    }

    /// All tags pointing at the current commit.
    pub fn tags_at_head(&self) -> Result<Vec<String>, CommandError> {
        Ok(split_lines(&self.run(&["tag", "--points-at", "HEAD"])?))
    }

    /// All tags in the repository.
    pub fn tags(&self) -> Result<Vec<String>, CommandError> {
        Ok(split_lines(&self.run(&["tag"])?))
    }

    /// Whether `ancestor` is an ancestor of `descendant`.
    ///
    /// `git merge-base --is-ancestor` reports both "not an ancestor" and
    /// "unknown revision" through a non-zero exit; both map to `false`, so
    /// a stale registry entry degrades to the date tie-break instead of
    /// aborting the run.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, CommandError> {
        run_status(
            "git",
            &["merge-base", "--is-ancestor", ancestor, descendant],
            Some(&self.workdir),
        )
    }

    /// Fetch all tags from the default remote.
    pub fn fetch_tags(&self) -> Result<(), CommandError> {
        self.run(&["fetch", "--tags"]).map(drop)
    }

    /// Shallow-fetch one branch; tolerated failure.
    ///
    /// The publishing branch may not exist yet on the very first run.
    pub fn fetch_branch_shallow(&self, remote: &str, branch: &str) {
        if let Err(err) = self.run(&["fetch", remote, branch, "--depth=1"]) {
            tracing::debug!(%remote, %branch, error = %err, "branch fetch tolerated");
        }
    }

    /// Push one branch to a remote.
    pub fn push(&self, remote: &str, branch: &str) -> Result<(), CommandError> {
        self.run(&["push", remote, branch]).map(drop)
    }

    /// Check out a commit, tag, or branch.
    pub fn checkout(&self, rev: &str) -> Result<(), CommandError> {
        self.run(&["checkout", rev]).map(drop)
    }

    /// Remove untracked files and directories.
    pub fn clean_force(&self) -> Result<(), CommandError> {
        self.run(&["clean", "-d", "-x", "--force"]).map(drop)
    }

    /// Bring submodules in line with the checked-out revision.
    pub fn submodule_update(&self) -> Result<(), CommandError> {
        self.run(&["submodule", "update", "--init", "--recursive"])
            .map(drop)
    }
}

impl History for Git {
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        Git::is_ancestor(self, ancestor, descendant).unwrap_or(false)
    }
}

fn split_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Initialize a repository with one commit and return it.
    fn init_repo() -> (TempDir, Git) {
        let dir = TempDir::new().unwrap();
        let git = Git::new(dir.path());

        run_captured("git", &["init", "-q"], Some(dir.path())).unwrap();
        run_captured(
            "git",
            &["config", "user.email", "test@example.com"],
            Some(dir.path()),
        )
        .unwrap();
        run_captured("git", &["config", "user.name", "Test"], Some(dir.path())).unwrap();
        std::fs::write(dir.path().join("file.txt"), "one").unwrap();
        run_captured("git", &["add", "."], Some(dir.path())).unwrap();
        run_captured(
            "git",
            &["commit", "-q", "-m", "first", "--no-gpg-sign"],
            Some(dir.path()),
        )
        .unwrap();

        (dir, git)
    }

    #[test]
    fn test_head_commit_and_date() {
        let (_dir, git) = init_repo();

        let commit = git.head_commit().unwrap();
        assert_eq!(commit.len(), 40);

        let date = git.head_commit_date().unwrap();
        // Strict ISO-8601, e.g. 2024-03-01T10:00:00+00:00.
        assert!(date.contains('T'), "unexpected date format: {date}");
    }

    #[test]
    fn test_tags_at_head() {
        let (_dir, git) = init_repo();
        assert_eq!(git.tags_at_head().unwrap(), Vec::<String>::new());

        git.run(&["tag", "v1.0.0"]).unwrap();
        git.run(&["tag", "v1.0.1"]).unwrap();
        assert_eq!(git.tags_at_head().unwrap(), vec!["v1.0.0", "v1.0.1"]);
    }

    #[test]
    fn test_is_ancestor() {
        let (dir, git) = init_repo();
        let first = git.head_commit().unwrap();

        std::fs::write(dir.path().join("file.txt"), "two").unwrap();
        git.run(&["commit", "-q", "-am", "second", "--no-gpg-sign"])
            .unwrap();
        let second = git.head_commit().unwrap();

        assert!(git.is_ancestor(&first, &second).unwrap());
        assert!(!git.is_ancestor(&second, &first).unwrap());
        // A commit is its own ancestor.
        assert!(git.is_ancestor(&first, &first).unwrap());
        // Garbage revisions read as "not an ancestor" rather than failing.
        assert!(!git.is_ancestor("does-not-exist", &second).unwrap());
    }
}
