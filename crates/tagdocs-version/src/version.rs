//! Tag grammar and the total order over version identifiers.

use std::sync::OnceLock;

use regex::Regex;

/// Matches `v<major>.<minor>.<patch>[-rc.<rc>][-<depth>-g<hash>]`.
fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^v(?P<major>\d+)\.(?P<minor>\d+)\.(?P<patch>\d+)(?:-rc\.(?P<rc>\d+))?(?:-(?P<depth>\d+)-g(?P<hash>\w+))?$",
        )
        .expect("tag grammar regex compiles")
    })
}

/// A tag parsed from the version grammar.
///
/// A string either fully matches the grammar or is treated as an opaque,
/// non-version identifier — parsing never fails with an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionTag {
    /// Major version.
    pub major: u64,
    /// Minor version.
    pub minor: u64,
    /// Patch version.
    pub patch: u64,
    /// Release-candidate number, absent for final releases.
    pub rc: Option<u64>,
    /// Trailing `git describe` component, absent for the tag itself.
    pub describe: Option<Describe>,
}

/// The `git describe` suffix: commits since the tag plus an abbreviated hash.
///
/// The hash is informational only and never participates in ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Describe {
    /// Number of commits since the tag.
    pub depth: u64,
    /// Abbreviated commit hash.
    pub hash: String,
}

impl VersionTag {
    /// Parse a tag string, returning `None` for anything outside the grammar.
    pub fn parse(tag: &str) -> Option<Self> {
        let caps = tag_regex().captures(tag)?;

        let major = caps["major"].parse().ok()?;
        let minor = caps["minor"].parse().ok()?;
        let patch = caps["patch"].parse().ok()?;
        let rc = match caps.name("rc") {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        let describe = match (caps.name("depth"), caps.name("hash")) {
            (Some(depth), Some(hash)) => Some(Describe {
                depth: depth.as_str().parse().ok()?,
                hash: hash.as_str().to_owned(),
            }),
            _ => None,
        };

        Some(Self {
            major,
            minor,
            patch,
            rc,
            describe,
        })
    }

    /// `true` when the tag carries an `-rc.<n>` component.
    pub fn is_release_candidate(&self) -> bool {
        self.rc.is_some()
    }
}

/// `true` iff the identifier parses as a version tag with an rc component.
pub fn is_release_candidate(identifier: &str) -> bool {
    VersionTag::parse(identifier).is_some_and(|tag| tag.is_release_candidate())
}

/// Where identifiers outside the version grammar rank relative to real versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpaqueRank {
    /// Opaque strings sort below every valid version.
    Low,
    /// Opaque strings sort above every valid version.
    High,
}

/// Totally ordered key over tags and free-form version identifiers.
///
/// Release candidates and `git describe` tags order non-obviously. The
/// correct order, highest to lowest:
///
/// ```text
/// v1.2.4
/// v1.2.4-rc.2-1-gXXXXX
/// v1.2.4-rc.2
/// v1.2.4-rc.1
/// v1.2.3
/// ```
///
/// An absent rc is a final release and outranks all release candidates, so
/// it maps to a sentinel above any real rc number. An absent depth is the
/// tag itself and ranks below any post-tag commit, so it maps to zero.
///
/// The variant order is load-bearing: `OpaqueLow` sorts below every
/// `Version` and `OpaqueHigh` above, with opaque strings comparing among
/// themselves by plain string order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Non-version identifier ranked below all versions.
    OpaqueLow(String),
    /// A parsed version, ordered lexicographically over its fields.
    Version {
        /// Major version.
        major: u64,
        /// Minor version.
        minor: u64,
        /// Patch version.
        patch: u64,
        /// Rc number, or `u64::MAX` for final releases.
        rc: u64,
        /// Commits since the tag, zero for the tag itself.
        depth: u64,
    },
    /// Non-version identifier ranked above all versions.
    OpaqueHigh(String),
}

/// Compute the sort key for an identifier.
///
/// Pure and total: any input is accepted, and malformed version-like
/// strings are treated as opaque.
pub fn sort_key(identifier: &str, opaque: OpaqueRank) -> SortKey {
    match VersionTag::parse(identifier) {
        Some(tag) => SortKey::Version {
            major: tag.major,
            minor: tag.minor,
            patch: tag.patch,
            rc: tag.rc.unwrap_or(u64::MAX),
            depth: tag.describe.as_ref().map_or(0, |d| d.depth),
        },
        None => match opaque {
            OpaqueRank::Low => SortKey::OpaqueLow(identifier.to_owned()),
            OpaqueRank::High => SortKey::OpaqueHigh(identifier.to_owned()),
        },
    }
}
