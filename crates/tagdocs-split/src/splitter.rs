//! One pass over the token stream: page boundaries, anchors, references.
//!
//! The parsed document is a flat, ordered sequence of structural events
//! with byte offsets into the source. Splitting works on those offsets:
//! each page is a span of the original text, so page output preserves the
//! author's formatting byte-for-byte outside rewritten destinations.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::anchor::heading_anchor;
use crate::page::{AnchorTable, Page};

/// Parser options for README-style documents.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// A link or image destination found in the document, inline or as a
/// reference-style definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LinkOccurrence {
    /// Destination as written.
    pub dest: String,
    /// Byte range of the construct containing the destination.
    pub span: Range<usize>,
}

/// Result of scanning the document once.
pub(crate) struct ScannedDocument {
    pub pages: Vec<Page>,
    pub anchors: AnchorTable,
    pub links: Vec<LinkOccurrence>,
}

/// Inline extent of the heading currently being read.
struct HeadingCapture {
    level: HeadingLevel,
    start: usize,
    text: Option<Range<usize>>,
}

/// Scan the document: carve pages at second-level headings, record an
/// anchor for every heading of every level, and collect each link and
/// image destination together with the span it occupies.
pub(crate) fn scan(source: &str) -> ScannedDocument {
    let parser = Parser::new_ext(source, parser_options());

    // Reference-style definitions live outside the event stream; their
    // destinations get rewritten at the definition site.
    let mut links: Vec<LinkOccurrence> = parser
        .reference_definitions()
        .iter()
        .map(|(_, definition)| LinkOccurrence {
            dest: definition.dest.to_string(),
            span: definition.span.clone(),
        })
        .collect();

    let mut pages = vec![Page::home()];
    let mut anchors = AnchorTable::default();
    let mut heading: Option<HeadingCapture> = None;

    for (event, range) in parser.into_offset_iter() {
        // Extend the current heading over its inline children.
        match &event {
            Event::Start(Tag::Heading { .. }) | Event::End(TagEnd::Heading(_)) => {}
            _ => {
                if let Some(capture) = heading.as_mut() {
                    match capture.text.as_mut() {
                        Some(text) => text.end = text.end.max(range.end),
                        None => capture.text = Some(range.clone()),
                    }
                }
            }
        }

        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(HeadingCapture {
                    level,
                    start: range.start,
                    text: None,
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(capture) = heading.take() {
                    let title = capture
                        .text
                        .map_or("", |text| source[text].trim());

                    if capture.level == HeadingLevel::H2 {
                        // A new page begins at the heading itself.
                        pages.push(Page::for_heading(title, capture.start));
                    }

                    let filename = pages[pages.len() - 1].filename.clone();
                    anchors.insert(&heading_anchor(title), &filename);
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) | Event::Start(Tag::Image { dest_url, .. }) => {
                links.push(LinkOccurrence {
                    dest: dest_url.to_string(),
                    span: range,
                });
            }
            _ => {}
        }
    }

    // Close the spans: each page runs to the start of the next.
    let mut end = source.len();
    for page in pages.iter_mut().rev() {
        page.span.end = end;
        end = page.span.start;
    }

    ScannedDocument {
        pages,
        anchors,
        links,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_document_without_splits_is_all_home() {
        let source = "# Title\n\nSome text.\n\n### Deep heading\n";
        let scanned = scan(source);

        assert_eq!(scanned.pages.len(), 1);
        assert_eq!(scanned.pages[0].title, "Home");
        assert_eq!(scanned.pages[0].filename, "index.md");
        assert_eq!(scanned.pages[0].span, 0..source.len());
    }

    #[test]
    fn test_second_level_headings_start_pages() {
        let source = "intro\n\n## First\n\nbody\n\n## Second\n\nmore\n";
        let scanned = scan(source);

        let titles: Vec<&str> = scanned.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "First", "Second"]);

        let first_start = source.find("## First").unwrap();
        let second_start = source.find("## Second").unwrap();
        assert_eq!(scanned.pages[0].span, 0..first_start);
        assert_eq!(scanned.pages[1].span, first_start..second_start);
        assert_eq!(scanned.pages[2].span, second_start..source.len());
    }

    #[test]
    fn test_only_h2_starts_pages() {
        let source = "# One\n\n### Three\n\n#### Four\n";
        let scanned = scan(source);
        assert_eq!(scanned.pages.len(), 1);
        // Every heading still lands in the anchor table.
        assert_eq!(scanned.anchors.len(), 3);
    }

    #[test]
    fn test_anchors_point_at_owning_page() {
        let source = "# Intro\n\n## Guide\n\n### Steps\n";
        let scanned = scan(source);

        assert_eq!(scanned.anchors.lookup("intro"), Some("index.md"));
        assert_eq!(scanned.anchors.lookup("guide"), Some("guide.md"));
        assert_eq!(scanned.anchors.lookup("steps"), Some("guide.md"));
    }

    #[test]
    fn test_duplicate_anchors_numbered_in_document_order() {
        let source = "## Overview\n\n## Overview\n";
        let scanned = scan(source);

        assert_eq!(scanned.anchors.lookup("overview"), Some("overview.md"));
        // The second page keeps its derived filename; only the id is suffixed.
        assert_eq!(scanned.anchors.lookup("overview-1"), Some("overview.md"));
    }

    #[test]
    fn test_heading_title_keeps_inline_markdown() {
        let source = "## Getting **Started** with `tagdocs`\n";
        let scanned = scan(source);

        assert_eq!(scanned.pages[1].title, "Getting **Started** with `tagdocs`");
        assert_eq!(scanned.pages[1].filename, "getting-started-with-tagdocs.md");
    }

    #[test]
    fn test_inline_links_and_images_collected() {
        let source = "[a](one.md) and ![b](two.png)\n";
        let scanned = scan(source);

        let dests: Vec<&str> = scanned.links.iter().map(|l| l.dest.as_str()).collect();
        assert_eq!(dests, vec!["one.md", "two.png"]);
    }

    #[test]
    fn test_reference_definitions_collected() {
        let source = "See [docs][ref].\n\n[ref]: guide/setup.md\n";
        let scanned = scan(source);

        assert!(scanned.links.iter().any(|l| l.dest == "guide/setup.md"));
    }

    #[test]
    fn test_setext_heading_starts_page() {
        let source = "intro\n\nSection\n-------\n\nbody\n";
        let scanned = scan(source);

        assert_eq!(scanned.pages.len(), 2);
        assert_eq!(scanned.pages[1].title, "Section");
        assert_eq!(scanned.pages[1].span.start, source.find("Section").unwrap());
    }
}
