//! Site configuration assembly.
//!
//! Builds the MkDocs configuration document for a repository: defaults
//! derived from the repository identity, an optional user-provided config
//! overlaid on top, the plugins and markdown extensions the pipeline
//! requires, and the navigation generated by splitting the README.
//!
//! The generated configuration *extends* what the user provides — user
//! keys replace defaults, required plugins are appended only when missing,
//! and generated navigation is prepended to any user navigation.

mod builder;
mod config;
mod inherit;

use std::path::PathBuf;

use tagdocs_split::SplitError;

pub use builder::{BuiltSite, CONFIG_FILENAME, SiteOptions, build_site};
pub use config::validate_repo_name;
pub use inherit::{InheritedConfig, inherited_config};
pub use tagdocs_split::NavEntry;

/// Error assembling the site configuration.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Repository name not of the form `org/repo`.
    #[error("invalid repository name `{0}`: expected `org/repo`")]
    RepoName(String),
    /// Repository root directory missing.
    #[error("repository directory {} not found", .0.display())]
    RepositoryNotFound(PathBuf),
    /// User configuration file missing.
    #[error("config file {} not found", .0.display())]
    ConfigNotFound(PathBuf),
    /// User configuration file resolves outside the repository.
    #[error("config file {} outside of repository", .0.display())]
    ConfigOutsideRepository(PathBuf),
    /// README missing.
    #[error("README {} not found", .0.display())]
    ReadmeNotFound(PathBuf),
    /// README resolves outside the repository.
    #[error("README {} outside of repository", .0.display())]
    ReadmeOutsideRepository(PathBuf),
    /// `docs_dir` must stay inside the repository.
    #[error("docs_dir `{0}` cannot be absolute")]
    AbsoluteDocsDir(String),
    /// Malformed YAML in the user configuration.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failure while splitting the README.
    #[error(transparent)]
    Split(#[from] SplitError),
}
