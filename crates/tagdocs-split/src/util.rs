//! Path utilities.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, resolving `.` and `..` components without
/// consulting the filesystem.
///
/// Joined link targets are normalized against an already-canonical base, so
/// the result is comparable with `starts_with` even when the target does
/// not exist on disk.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Render a relative path with forward slashes for use in a URL.
pub(crate) fn path_to_url(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_resolves_dot_segments() {
        assert_eq!(
            normalize_path(Path::new("/repo/./docs/../img/logo.png")),
            PathBuf::from("/repo/img/logo.png")
        );
    }

    #[test]
    fn test_normalize_keeps_plain_paths() {
        assert_eq!(
            normalize_path(Path::new("/repo/docs/index.md")),
            PathBuf::from("/repo/docs/index.md")
        );
    }

    #[test]
    fn test_normalize_escaping_path_does_not_match_base() {
        let resolved = normalize_path(Path::new("/repo/../elsewhere/secret"));
        assert!(!resolved.starts_with("/repo"));
    }

    #[test]
    fn test_path_to_url_uses_forward_slashes() {
        assert_eq!(path_to_url(Path::new("img/logo.png")), "img/logo.png");
        assert_eq!(path_to_url(Path::new("a/b/c")), "a/b/c");
    }
}
