//! Alias assignment for the commit being documented.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::registry::VersionRegistry;
use crate::version::{OpaqueRank, VersionTag, is_release_candidate, sort_key};

/// The rolling development version identifier.
pub const DEVELOPMENT: &str = "development";
/// Alias tracking the newest final release.
pub const LATEST: &str = "latest";
/// Alias tracking the newest published tag, release candidate or not.
pub const RELEASE_CANDIDATE: &str = "release-candidate";

/// Identity of the commit being documented.
///
/// Serializes to the property bag recorded with every published version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    /// Full commit hash.
    pub commit: String,
    /// Committer date, ISO-8601.
    pub date: String,
}

/// Commit-graph reachability oracle.
///
/// `is_ancestor(a, b)` answers whether `a` is reachable from `b` (a commit
/// is considered its own ancestor). Implementations back this with the
/// version control tool; tests supply synthetic graphs.
pub trait History {
    /// `true` when `ancestor` is an ancestor of `descendant`.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool;
}

/// One `(version, aliases, properties)` tuple destined for the publisher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasAssignment {
    /// Version identifier to publish under.
    pub version: String,
    /// Symbolic aliases to (re)point at this version.
    pub aliases: BTreeSet<String>,
    /// Properties to record alongside the version.
    pub props: CommitInfo,
}

/// Plan the versions and aliases to publish for the current commit.
///
/// The commit gets one assignment per version-grammar tag pointing at it
/// that has not already been published at this exact commit, plus the
/// `development` assignment when the commit supersedes the registered
/// development snapshot (see [`development_is_current`]).
///
/// Aliases:
/// - an empty registry marks the first-ever publish, so every emitted
///   version also receives `latest`;
/// - a tag ranking strictly above every registered identifier receives
///   `release-candidate` — whether or not it is an rc itself, so the alias
///   never lags behind `latest`;
/// - a non-rc tag ranking strictly above every registered non-rc
///   identifier receives `latest`.
///
/// The development assignment comes first, then tags in ascending sort-key
/// order.
pub fn plan_assignments(
    head_tags: &[String],
    head: &CommitInfo,
    registry: &VersionRegistry,
    history: &dyn History,
) -> Vec<AliasAssignment> {
    // First-ever publish: the site needs a `latest` to land on.
    let mut base_aliases = BTreeSet::new();
    if registry.is_empty() {
        base_aliases.insert(LATEST.to_owned());
    }

    let mut plan = Vec::new();

    if development_is_current(registry, head, history) {
        plan.push(AliasAssignment {
            version: DEVELOPMENT.to_owned(),
            aliases: base_aliases.clone(),
            props: head.clone(),
        });
    }

    let mut tags: Vec<&String> = head_tags
        .iter()
        .filter(|tag| VersionTag::parse(tag).is_some())
        .collect();
    tags.sort_by_key(|tag| sort_key(tag, OpaqueRank::Low));

    let highest = registry.highest_key();
    let highest_final = registry.highest_final_key();

    for tag in tags {
        if registry.published_commit(tag) == Some(head.commit.as_str()) {
            // Already documented at this exact commit.
            continue;
        }

        let mut aliases = base_aliases.clone();
        let key = sort_key(tag, OpaqueRank::Low);

        if key > highest {
            aliases.insert(RELEASE_CANDIDATE.to_owned());
        }

        if !is_release_candidate(tag) && key > highest_final {
            aliases.insert(LATEST.to_owned());
        }

        plan.push(AliasAssignment {
            version: (*tag).clone(),
            aliases,
            props: head.clone(),
        });
    }

    plan
}

/// Decide whether the current commit supersedes the registered
/// `development` snapshot.
///
/// It does unless the registry already documents this exact commit, or
/// records a development commit that is a strict descendant of the current
/// one. A missing or incomplete registry entry is treated permissively as
/// older. When neither commit is an ancestor of the other the committer
/// dates break the tie — a documented best-effort fallback for rewritten
/// histories, not a correctness guarantee.
fn development_is_current(
    registry: &VersionRegistry,
    head: &CommitInfo,
    history: &dyn History,
) -> bool {
    let Some(entry) = registry.get(DEVELOPMENT) else {
        return true;
    };
    let Some(props) = entry.properties.as_ref() else {
        return true;
    };
    let (Some(dev_commit), Some(dev_date)) = (props.commit.as_deref(), props.date.as_deref())
    else {
        return true;
    };

    if dev_commit == head.commit {
        // Already documented at this exact commit.
        return false;
    }

    if history.is_ancestor(dev_commit, &head.commit) {
        // Fast-forward: the registered snapshot is an ancestor.
        return true;
    }

    if history.is_ancestor(&head.commit, dev_commit) {
        // The registered snapshot already supersedes this commit.
        return false;
    }

    match (parse_date(&head.date), parse_date(dev_date)) {
        (Some(head_date), Some(registered)) => head_date > registered,
        // Unparsable dates get the same permissive treatment as missing ones.
        _ => true,
    }
}

fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(date).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::registry::{DocumentedVersion, VersionProps};

    /// Linear history: each commit's ancestors are everything before it.
    struct Linear(Vec<&'static str>);

    impl History for Linear {
        fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
            let pos = |commit: &str| self.0.iter().position(|c| *c == commit);
            match (pos(ancestor), pos(descendant)) {
                (Some(a), Some(d)) => a <= d,
                _ => false,
            }
        }
    }

    /// No commit is related to any other.
    struct Unrelated;

    impl History for Unrelated {
        fn is_ancestor(&self, _: &str, _: &str) -> bool {
            false
        }
    }

    fn head(commit: &str, date: &str) -> CommitInfo {
        CommitInfo {
            commit: commit.to_owned(),
            date: date.to_owned(),
        }
    }

    fn published(version: &str, commit: &str, date: &str) -> DocumentedVersion {
        DocumentedVersion {
            version: version.to_owned(),
            title: None,
            aliases: Vec::new(),
            properties: Some(VersionProps {
                commit: Some(commit.to_owned()),
                date: Some(date.to_owned()),
            }),
        }
    }

    fn aliases(assignment: &AliasAssignment) -> Vec<&str> {
        assignment.aliases.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_bootstrap_gets_latest() {
        let registry = VersionRegistry::default();
        let head = head("c1", "2024-03-01T10:00:00+00:00");

        let plan = plan_assignments(
            &["v1.0.0".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1"]),
        );

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].version, DEVELOPMENT);
        assert_eq!(aliases(&plan[0]), vec![LATEST]);
        assert_eq!(plan[1].version, "v1.0.0");
        // First publish plus highest tag: both roles apply.
        assert_eq!(aliases(&plan[1]), vec![LATEST, RELEASE_CANDIDATE]);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let head = head("c2", "2024-03-02T10:00:00+00:00");
        let registry = VersionRegistry::from_entries([
            published(DEVELOPMENT, "c2", "2024-03-02T10:00:00+00:00"),
            published("v1.1.0", "c2", "2024-03-02T10:00:00+00:00"),
        ]);

        let plan = plan_assignments(
            &["v1.1.0".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1", "c2"]),
        );

        assert_eq!(plan, Vec::new());
    }

    #[test]
    fn test_development_follows_fast_forward() {
        let head = head("c3", "2024-03-03T10:00:00+00:00");
        let registry =
            VersionRegistry::from_entries([published(DEVELOPMENT, "c1", "2024-03-01T10:00:00+00:00")]);

        let plan = plan_assignments(&[], &head, &registry, &Linear(vec!["c1", "c2", "c3"]));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, DEVELOPMENT);
        assert!(plan[0].aliases.is_empty());
    }

    #[test]
    fn test_development_not_reassigned_to_older_commit() {
        let head = head("c1", "2024-03-01T10:00:00+00:00");
        let registry =
            VersionRegistry::from_entries([published(DEVELOPMENT, "c3", "2024-03-03T10:00:00+00:00")]);

        let plan = plan_assignments(&[], &head, &registry, &Linear(vec!["c1", "c2", "c3"]));

        assert_eq!(plan, Vec::new());
    }

    #[test]
    fn test_development_divergent_history_date_tiebreak() {
        let registry =
            VersionRegistry::from_entries([published(DEVELOPMENT, "x9", "2024-03-02T10:00:00+00:00")]);

        // Later date wins.
        let newer = head("c1", "2024-03-05T10:00:00+00:00");
        assert_eq!(
            plan_assignments(&[], &newer, &registry, &Unrelated).len(),
            1
        );

        // Earlier date loses.
        let older = head("c1", "2024-03-01T10:00:00+00:00");
        assert_eq!(plan_assignments(&[], &older, &registry, &Unrelated), Vec::new());
    }

    #[test]
    fn test_development_malformed_registry_entry_is_permissive() {
        let registry = VersionRegistry::from_entries([DocumentedVersion {
            version: DEVELOPMENT.to_owned(),
            title: None,
            aliases: Vec::new(),
            properties: Some(VersionProps {
                commit: Some("x9".to_owned()),
                date: Some("not-a-date".to_owned()),
            }),
        }]);

        let head = head("c1", "2024-03-01T10:00:00+00:00");
        let plan = plan_assignments(&[], &head, &registry, &Unrelated);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, DEVELOPMENT);
    }

    #[test]
    fn test_release_candidate_moves_to_new_final_release() {
        let head = head("c5", "2024-03-05T10:00:00+00:00");
        let registry = VersionRegistry::from_entries([
            published(DEVELOPMENT, "c5", "2024-03-05T10:00:00+00:00"),
            published("v1.1.0", "c2", "2024-03-02T10:00:00+00:00"),
            published("v1.2.0-rc.1", "c3", "2024-03-03T10:00:00+00:00"),
        ]);

        let plan = plan_assignments(
            &["v1.2.0".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1", "c2", "c3", "c4", "c5"]),
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, "v1.2.0");
        // Not an rc, yet it takes release-candidate so the alias never lags.
        assert_eq!(aliases(&plan[0]), vec![LATEST, RELEASE_CANDIDATE]);
    }

    #[test]
    fn test_rc_tag_does_not_take_latest() {
        let head = head("c5", "2024-03-05T10:00:00+00:00");
        let registry = VersionRegistry::from_entries([
            published(DEVELOPMENT, "c5", "2024-03-05T10:00:00+00:00"),
            published("v1.1.0", "c2", "2024-03-02T10:00:00+00:00"),
        ]);

        let plan = plan_assignments(
            &["v1.2.0-rc.1".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1", "c2", "c3", "c4", "c5"]),
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, "v1.2.0-rc.1");
        assert_eq!(aliases(&plan[0]), vec![RELEASE_CANDIDATE]);
    }

    #[test]
    fn test_old_tag_gets_no_aliases() {
        let head = head("c1", "2024-03-01T10:00:00+00:00");
        let registry = VersionRegistry::from_entries([
            published(DEVELOPMENT, "c5", "2024-03-05T10:00:00+00:00"),
            published("v2.0.0", "c5", "2024-03-05T10:00:00+00:00"),
        ]);

        let plan = plan_assignments(
            &["v1.0.1".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1", "c2", "c3", "c4", "c5"]),
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, "v1.0.1");
        assert!(plan[0].aliases.is_empty());
    }

    #[test]
    fn test_multiple_tags_emitted_in_ascending_order() {
        let registry = VersionRegistry::default();
        let head = head("c1", "2024-03-01T10:00:00+00:00");

        let plan = plan_assignments(
            &["v1.0.0".to_owned(), "v0.9.0".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1"]),
        );

        let versions: Vec<&str> = plan.iter().map(|a| a.version.as_str()).collect();
        assert_eq!(versions, vec![DEVELOPMENT, "v0.9.0", "v1.0.0"]);
    }

    #[test]
    fn test_non_grammar_tags_are_ignored() {
        let registry = VersionRegistry::default();
        let head = head("c1", "2024-03-01T10:00:00+00:00");

        let plan = plan_assignments(
            &["nightly".to_owned(), "v1.0".to_owned()],
            &head,
            &registry,
            &Linear(vec!["c1"]),
        );

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].version, DEVELOPMENT);
    }
}
