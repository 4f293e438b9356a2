//! Version ordering and alias assignment for tag-driven documentation.
//!
//! This crate decides *which* documentation versions exist and what the
//! symbolic aliases (`latest`, `release-candidate`, `development`) point at:
//!
//! - [`VersionTag`] parses the `v<major>.<minor>.<patch>[-rc.<n>][-<depth>-g<hash>]`
//!   tag grammar produced by `git describe`.
//! - [`sort_key`] defines a total order over tags and free-form version
//!   identifiers, usable directly as a sort key.
//! - [`VersionRegistry`] models the already-published versions as reported
//!   by the external publisher.
//! - [`plan_assignments`] computes the `(version, aliases, properties)`
//!   tuples to hand to the publisher for the current commit.
//!
//! The registry is read-only here; all writes to it happen through the
//! external publisher.

mod aliases;
mod registry;
mod version;

pub use aliases::{
    AliasAssignment, CommitInfo, DEVELOPMENT, History, LATEST, RELEASE_CANDIDATE, plan_assignments,
};
pub use registry::{DocumentedVersion, VersionProps, VersionRegistry};
pub use version::{Describe, OpaqueRank, SortKey, VersionTag, is_release_candidate, sort_key};
