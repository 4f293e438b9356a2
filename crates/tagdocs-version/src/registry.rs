//! Registry of already-published documentation versions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::version::{OpaqueRank, SortKey, is_release_candidate, sort_key};

/// Properties recorded when a version was first published.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionProps {
    /// Source commit hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Committer date of the source commit, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One published documentation version, as reported by `mike list --json`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentedVersion {
    /// Permanent version identifier.
    pub version: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Symbolic aliases currently pointing at this version.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Property bag established at first publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<VersionProps>,
}

/// Published versions keyed by identifier.
///
/// Read-only to this crate: entries are created and mutated exclusively by
/// the external publisher, and queried here to plan new assignments.
#[derive(Clone, Debug, Default)]
pub struct VersionRegistry {
    entries: BTreeMap<String, DocumentedVersion>,
}

/// Floor used when the registry has no comparable entries.
const VERSION_FLOOR: &str = "v0.0.0";

impl VersionRegistry {
    /// Build a registry from a list of published versions.
    pub fn from_entries(entries: impl IntoIterator<Item = DocumentedVersion>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.version.clone(), entry))
                .collect(),
        }
    }

    /// Parse the publisher's JSON listing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<DocumentedVersion> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// `true` when nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of published versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up a version by identifier.
    pub fn get(&self, version: &str) -> Option<&DocumentedVersion> {
        self.entries.get(version)
    }

    /// The commit hash recorded for a version, if any.
    pub fn published_commit(&self, version: &str) -> Option<&str> {
        self.get(version)?.properties.as_ref()?.commit.as_deref()
    }

    /// Highest sort key among all registered identifiers.
    ///
    /// Falls back to the `v0.0.0` floor on an empty registry, so any real
    /// tag compares strictly higher.
    pub fn highest_key(&self) -> SortKey {
        self.entries
            .keys()
            .map(|version| sort_key(version, OpaqueRank::Low))
            .max()
            .unwrap_or_else(|| sort_key(VERSION_FLOOR, OpaqueRank::Low))
    }

    /// Highest sort key among registered non-release-candidate identifiers.
    pub fn highest_final_key(&self) -> SortKey {
        self.entries
            .keys()
            .filter(|version| !is_release_candidate(version))
            .map(|version| sort_key(version, OpaqueRank::Low))
            .max()
            .unwrap_or_else(|| sort_key(VERSION_FLOOR, OpaqueRank::Low))
    }
}
