//! Normalisation: deterministic cleanup of raw extracted text.
//!
//! OCR output and text pulled from converted documents carry layout noise
//! that has nothing to do with the questions themselves: `[Page N]` labels
//! between pages, copyright glyphs from page footers, and line breaks in the
//! middle of sentences. This module removes that noise so the chunker sees
//! one flat line of text in which every `Question<N>` marker is a reliable
//! chunk boundary.
//!
//! ## Rule Order
//!
//! Rules must run in this order: page labels and glyphs are removed before
//! whitespace collapse, so the gaps they leave behind are folded into a
//! single space instead of surviving as double spaces.
//!
//! [`normalize`] is idempotent. Collapsing whitespace can close up a label
//! that OCR split across lines (`[Page\n3]`), and removing a glyph can join
//! one (`[Pa©ge 3]`), so the rules are re-applied until the text stops
//! changing. Every pass that changes the text makes it shorter, so this
//! terminates.

use crate::patterns::PAGE_MARKER;

/// Apply all normalisation rules to raw document text.
///
/// Rules (applied in order):
/// 1. Remove `[Page …]` labels
/// 2. Remove copyright glyphs
/// 3. Collapse every whitespace run (newlines included) to one space, trim
pub fn normalize(raw: &str) -> String {
    let mut current = apply_rules(raw);
    loop {
        let next = apply_rules(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn apply_rules(input: &str) -> String {
    let s = remove_page_markers(input);
    let s = remove_copyright_glyphs(&s);
    collapse_whitespace(&s)
}

// ── Rule 1: Remove page markers ──────────────────────────────────────────────

fn remove_page_markers(input: &str) -> String {
    PAGE_MARKER.replace_all(input, "").into_owned()
}

// ── Rule 2: Remove copyright glyphs ──────────────────────────────────────────

fn remove_copyright_glyphs(input: &str) -> String {
    input.replace('©', "")
}

// ── Rule 3: Collapse whitespace ──────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_page_markers() {
        assert_eq!(remove_page_markers("a [Page 1] b [Page 12]"), "a  b ");
    }

    #[test]
    fn test_page_marker_is_non_greedy() {
        assert_eq!(
            remove_page_markers("[Page 1] keep [this] [Page 2]"),
            " keep [this] "
        );
    }

    #[test]
    fn test_remove_copyright() {
        assert_eq!(remove_copyright_glyphs("© Acme ©2020"), " Acme 2020");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t\tc  \r\n"), "a b c");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n [Page 1] \n © "), "");
    }

    #[test]
    fn test_normalize_full_pipeline() {
        let input =
            "\n[Page 1]\nPhysics © 2021\nQuestion1 What is\nforce?\n\n[Page 2]\nOptions: A. x";
        assert_eq!(
            normalize(input),
            "Physics 2021 Question1 What is force? Options: A. x"
        );
    }

    #[test]
    fn test_split_page_label_is_removed() {
        assert_eq!(normalize("a [Page\n3] b"), "a b");
        assert_eq!(normalize("a [Pa©ge 3] b"), "a b");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "",
            "[Page 1] Question1 What is 2+2? Options: A. 3 B. 4 C. 5 D. 6 Answer: B [Page 2]",
            "  ©©  Question 3\n\n\tText [NEET 2019]\n",
            "Ünïcödé  —  text\u{00A0}with nbsp",
            "[Page\n1] broken [Pa©ge 2] labels",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }
}
