//! Five-way link classification and rewriting.
//!
//! Every link and image destination in the document is classified exactly
//! once into a [`LinkCategory`] and then dispatched, so each case stays
//! independently testable.

use std::fs;
use std::path::{Path, PathBuf};

use crate::SplitError;
use crate::anchor::heading_anchor;
use crate::page::AnchorTable;
use crate::util::{normalize_path, path_to_url};

/// Image MIME types accepted for relocation into the image directory.
const IMAGE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/tiff",
    "image/svg+xml",
];

/// How a single reference target is handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkCategory {
    /// Absolute URL (carries a scheme or network host): left untouched.
    /// Paths escaping the document's directory tree fall through to here.
    External,
    /// Target already inside the docs output area: path made docs-relative.
    RelocatedAsset(PathBuf),
    /// Repository image file: copied into the image directory.
    CopyableImage(PathBuf),
    /// Any other repository file: pointed at the host's code browser.
    SourceFile(PathBuf),
    /// Fragment resolved through the anchor table.
    Anchor {
        /// Page containing the anchor.
        file: String,
        /// Normalized anchor id.
        id: String,
    },
    /// Fragment with no matching heading anywhere in the document.
    Broken(String),
}

/// A reference target decomposed into URL components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct LinkTarget<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> LinkTarget<'a> {
    fn parse(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (scheme, rest) = match rest.split_once(':') {
            Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme), rest),
            _ => (None, rest),
        };
        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => match after.find('/') {
                Some(at) => (Some(&after[..at]), &after[at..]),
                None => (Some(after), ""),
            },
            None => (None, rest),
        };

        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }

    fn is_absolute(&self) -> bool {
        self.scheme.is_some() || self.authority.is_some()
    }

    /// Reassemble around a replacement path, keeping query and fragment.
    fn with_path(&self, path: &str) -> String {
        let mut out = path.to_owned();
        if let Some(query) = self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_accepted_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| IMAGE_MIME_TYPES.contains(&mime.essence_str()))
}

/// Classifies and rewrites every reference in one document.
pub(crate) struct LinkRewriter<'a> {
    /// Directory containing the source document; the boundary for rewrites.
    readme_dir: &'a Path,
    /// Docs output area.
    docs_dir: &'a Path,
    /// Image directory inside the docs area.
    img_dir: &'a Path,
    /// Repository name, `org/repo`.
    repo: &'a str,
    /// Commit or ref the generated source links point at.
    commit: &'a str,
    anchors: &'a AnchorTable,
    warnings: Vec<String>,
}

impl<'a> LinkRewriter<'a> {
    pub(crate) fn new(
        readme_dir: &'a Path,
        docs_dir: &'a Path,
        img_dir: &'a Path,
        repo: &'a str,
        commit: &'a str,
        anchors: &'a AnchorTable,
    ) -> Self {
        Self {
            readme_dir,
            docs_dir,
            img_dir,
            repo,
            commit,
            anchors,
            warnings: Vec::new(),
        }
    }

    /// Classify a reference target without touching the filesystem beyond
    /// an existence/type probe for image candidates.
    pub(crate) fn classify(&self, dest: &str) -> LinkCategory {
        let target = LinkTarget::parse(dest);

        if target.is_absolute() {
            return LinkCategory::External;
        }

        if !target.path.is_empty() {
            let resolved = normalize_path(&self.readme_dir.join(target.path));

            // Only paths inside the document's own tree are rewritten.
            let Ok(repo_relative) = resolved
                .strip_prefix(self.readme_dir)
                .map(Path::to_path_buf)
            else {
                return LinkCategory::External;
            };

            if let Ok(inside_docs) = resolved.strip_prefix(self.docs_dir) {
                return LinkCategory::RelocatedAsset(inside_docs.to_path_buf());
            }

            if resolved.is_file() && is_accepted_image(&resolved) {
                return LinkCategory::CopyableImage(resolved);
            }

            return LinkCategory::SourceFile(repo_relative);
        }

        if let Some(fragment) = target.fragment {
            let id = heading_anchor(fragment);
            return match self.anchors.lookup(&id) {
                Some(file) => LinkCategory::Anchor {
                    file: file.to_owned(),
                    id,
                },
                None => LinkCategory::Broken(fragment.to_owned()),
            };
        }

        LinkCategory::External
    }

    /// Rewrite one destination.
    ///
    /// Returns the replacement text, or `None` when the destination stays
    /// as written. Image relocation copies the file as a side effect.
    pub(crate) fn rewrite(&mut self, dest: &str) -> Result<Option<String>, SplitError> {
        let target = LinkTarget::parse(dest);

        match self.classify(dest) {
            LinkCategory::External => Ok(None),
            LinkCategory::RelocatedAsset(inside_docs) => {
                Ok(Some(target.with_path(&path_to_url(&inside_docs))))
            }
            LinkCategory::CopyableImage(source) => {
                let Some(name) = source.file_name() else {
                    return Ok(None);
                };
                let output = self.img_dir.join(name);
                fs::copy(&source, &output)?;

                let docs_relative = output.strip_prefix(self.docs_dir).unwrap_or(&output);
                Ok(Some(target.with_path(&path_to_url(docs_relative))))
            }
            LinkCategory::SourceFile(repo_relative) => Ok(Some(target.with_path(&format!(
                "https://github.com/{}/blob/{}/{}",
                self.repo,
                self.commit,
                path_to_url(&repo_relative)
            )))),
            LinkCategory::Anchor { file, id } => Ok(Some(format!("{file}#{id}"))),
            LinkCategory::Broken(fragment) => {
                tracing::warn!(fragment = %fragment, "broken anchor link");
                self.warnings.push(format!("Broken anchor link #{fragment}"));
                Ok(None)
            }
        }
    }

    pub(crate) fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
