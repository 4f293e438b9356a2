//! CLI error types.

use tagdocs_publish::PublishError;
use tagdocs_site::SiteError;
use tagdocs_vcs::CommandError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}
