//! Heading-to-anchor-id resolution.
//!
//! Replicates the anchor rule of the static hosting platform so that
//! pre-existing external links to `#section` anchors keep resolving after
//! the document is split. The rule is a versioned contract: if the
//! platform changes its algorithm, [`heading_anchor`] must follow.

use pulldown_cmark::{Event, Options, Parser};

/// Reduce inline markdown to its visible plain text.
///
/// Code-span content is kept literally; emphasis, strong, strikethrough,
/// and link decorations are dropped while the text inside them is
/// preserved.
pub fn strip_markdown(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_GFM;
    let mut plain = String::with_capacity(text.len());

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Text(text) | Event::Code(text) => plain.push_str(&text),
            Event::SoftBreak | Event::HardBreak => plain.push(' '),
            _ => {}
        }
    }

    plain
}

/// Compute the anchor id the hosting platform assigns to a heading.
///
/// Inline formatting is stripped down to plain text, every whitespace run
/// becomes a single hyphen, characters other than word characters, hyphens,
/// and underscores are removed, and the result is lowercased.
pub fn heading_anchor(text: &str) -> String {
    let plain = strip_markdown(text.trim());
    let mut anchor = String::with_capacity(plain.len());
    let mut pending_hyphen = false;

    for c in plain.trim().chars() {
        if c.is_whitespace() {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen {
            anchor.push('-');
            pending_hyphen = false;
        }
        if c.is_alphanumeric() || c == '_' || c == '-' {
            anchor.extend(c.to_lowercase());
        }
    }

    anchor
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_heading() {
        assert_eq!(heading_anchor("Set Up"), "set-up");
    }

    #[test]
    fn test_known_platform_examples() {
        // Observed anchors on the hosting platform.
        assert_eq!(heading_anchor("Hello, World!"), "hello-world");
        assert_eq!(heading_anchor("What's New?"), "whats-new");
        assert_eq!(heading_anchor("foo_bar baz"), "foo_bar-baz");
        assert_eq!(heading_anchor("Version 1.2.3"), "version-123");
    }

    #[test]
    fn test_strips_emphasis_and_links() {
        assert_eq!(heading_anchor("The **Big** Picture"), "the-big-picture");
        assert_eq!(heading_anchor("See [the docs](https://example.com)"), "see-the-docs");
        assert_eq!(heading_anchor("~~Old~~ New"), "old-new");
    }

    #[test]
    fn test_keeps_code_span_content() {
        assert_eq!(heading_anchor("Using `tagdocs publish`"), "using-tagdocs-publish");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(heading_anchor("  Spaces  "), "spaces");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(heading_anchor("a \t b"), "a-b");
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(heading_anchor("READ ME"), "read-me");
    }

    #[test]
    fn test_strip_markdown_keeps_visible_text() {
        assert_eq!(strip_markdown("a **b** [c](d) `e`"), "a b c e");
    }
}
