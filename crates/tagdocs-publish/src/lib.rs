//! Publisher orchestration.
//!
//! Wraps the external versioned-docs publisher (`mike`) and drives the
//! whole pipeline for one commit: build the site configuration and pages,
//! read the registry of documented versions, plan alias assignments, and
//! deploy each one — with tag-pinned configuration overrides for tagged
//! versions — before pointing the site root at `latest`.

mod mike;
mod publisher;

pub use mike::Mike;
pub use publisher::{PUBLISH_BRANCH, PublishOptions, PublishSummary, publish};

use tagdocs_site::SiteError;
use tagdocs_vcs::CommandError;

/// Error during a publish run.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// An external tool invocation failed.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// Publisher metadata could not be serialized or parsed.
    #[error("publisher metadata JSON error: {0}")]
    Metadata(#[from] serde_json::Error),
    /// The site build failed.
    #[error(transparent)]
    Site(#[from] SiteError),
}
