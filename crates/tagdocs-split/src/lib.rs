//! Splits one README-style markdown document into a multi-page
//! documentation tree.
//!
//! The source document is parsed once into a flat, offset-annotated event
//! stream (the parser is an external dependency; nothing here re-implements
//! markdown). Second-level headings become page boundaries, every heading
//! contributes an anchor-table entry, and every link or image reference is
//! classified and rewritten so cross-references keep working after the
//! split:
//!
//! - absolute URLs stay untouched;
//! - targets already inside the docs area are made docs-relative;
//! - repository images are copied into `img/` next to the pages;
//! - other repository files point at the host's code browser, pinned to
//!   the documented commit;
//! - `#fragment` links are routed to whichever page ended up holding the
//!   heading, via [`heading_anchor`] normalization.
//!
//! Splitting is pure given the same input document and safe to re-run;
//! output files are simply overwritten.

mod anchor;
mod links;
mod page;
mod splitter;
mod util;

use std::fs;
use std::ops::Range;
use std::path::Path;

pub use anchor::{heading_anchor, strip_markdown};
pub use links::LinkCategory;
pub use page::{AnchorTable, HOME_FILENAME, HOME_TITLE, NavEntry, Page};

use links::LinkRewriter;

/// Error splitting a document.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// Filesystem failure while reading the document or writing pages.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inputs for one split run.
#[derive(Clone, Debug)]
pub struct SplitOptions<'a> {
    /// Absolute path of the source document.
    pub readme: &'a Path,
    /// Output directory for the generated pages.
    pub docs_dir: &'a Path,
    /// Repository name in `org/repo` form.
    pub repo: &'a str,
    /// Commit or ref the generated source links point at.
    pub commit: &'a str,
}

/// What a split run produced.
#[derive(Clone, Debug)]
pub struct SplitReport {
    /// Navigation entries, one per written page, in page order.
    pub nav: Vec<NavEntry>,
    /// Anchor table of the whole document.
    pub anchors: AnchorTable,
    /// Non-fatal problems (broken anchor links).
    pub warnings: Vec<String>,
}

/// Name of the image directory inside the docs area.
const IMG_DIR: &str = "img";

/// One destination substring to splice into the output.
struct Replacement {
    span: Range<usize>,
    text: String,
}

/// Split the document into pages under `docs_dir`, rewriting references
/// and relocating images along the way.
pub fn split_readme(options: &SplitOptions<'_>) -> Result<SplitReport, SplitError> {
    let source = fs::read_to_string(options.readme)?;

    fs::create_dir_all(options.docs_dir)?;
    let img_dir = options.docs_dir.join(IMG_DIR);
    fs::create_dir_all(&img_dir)?;

    // Canonical bases make the containment checks meaningful.
    let readme_dir = options
        .readme
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .canonicalize()?;
    let docs_dir = options.docs_dir.canonicalize()?;
    let img_dir = img_dir.canonicalize()?;

    let scanned = splitter::scan(&source);

    let mut rewriter = LinkRewriter::new(
        &readme_dir,
        &docs_dir,
        &img_dir,
        options.repo,
        options.commit,
        &scanned.anchors,
    );

    let mut replacements = Vec::new();
    for link in &scanned.links {
        if let Some(text) = rewriter.rewrite(&link.dest)?
            && let Some(span) = locate_destination(&source, &link.span, &link.dest)
        {
            replacements.push(Replacement { span, text });
        }
    }
    replacements.sort_by_key(|replacement| replacement.span.start);

    let mut nav = Vec::with_capacity(scanned.pages.len());
    for page in &scanned.pages {
        let content = splice(&source, &page.span, &replacements);
        fs::write(docs_dir.join(&page.filename), content)?;

        nav.push(NavEntry {
            title: strip_markdown(&page.title),
            file: page.filename.clone(),
        });
    }

    let warnings = rewriter.into_warnings();
    Ok(SplitReport {
        nav,
        anchors: scanned.anchors,
        warnings,
    })
}

/// Find the byte range of `dest` inside the construct that carries it.
///
/// The destination sits at the end of inline constructs (`[text](dest)`)
/// and after the label in definitions (`[label]: dest`), so the last
/// occurrence is the right one. Reference-style *uses* don't contain the
/// destination at all and yield `None`; their definition is rewritten
/// instead.
fn locate_destination(source: &str, span: &Range<usize>, dest: &str) -> Option<Range<usize>> {
    if dest.is_empty() {
        return None;
    }
    let offset = source[span.clone()].rfind(dest)?;
    let start = span.start + offset;
    Some(start..start + dest.len())
}

/// Extract one page's text, splicing in the rewritten destinations that
/// fall inside its span.
fn splice(source: &str, span: &Range<usize>, replacements: &[Replacement]) -> String {
    let mut out = String::with_capacity(span.len());
    let mut cursor = span.start;

    for replacement in replacements {
        if replacement.span.start < cursor || replacement.span.end > span.end {
            continue;
        }
        out.push_str(&source[cursor..replacement.span.start]);
        out.push_str(&replacement.text);
        cursor = replacement.span.end;
    }

    out.push_str(&source[cursor..span.end]);
    out
}
