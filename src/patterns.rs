//! Label patterns recognised in extracted question-paper text.
//!
//! Every regex the pipeline matches against lives here so the accepted
//! spellings of `Question`, `Options:`, `Answer:` and friends are defined in
//! exactly one place, and tests can exercise them directly.
//!
//! The year-tag pattern is the only one built at runtime, because its tag
//! word (`NEET`, `JEE`, …) comes from [`crate::config::ExtractionConfig`].

use once_cell::sync::Lazy;
use regex::Regex;

/// `[Page <anything>]` labels inserted between OCR'd pages.
pub static PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[Page.*?\]").unwrap());

/// Start of a question: `Question12`, `Question 12`.
pub static QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Question\s*(\d+)").unwrap());

/// The same marker, anchored at the start of a chunk, with trailing space.
pub static LEADING_QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Question\s*\d+\s*").unwrap());

/// Four bare option labels with nothing between them.
pub static IMAGE_ONLY_OPTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Options\s*:\s*A\.\s*B\.\s*C\.\s*D\.").unwrap());

/// Worked solution; it and everything after it is discarded.
pub static SOLUTION_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Solution\s*:").unwrap());

/// `Answer: B`. The `\b` keeps `Answer: Because…` from reading as `B`.
pub static ANSWER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Answer\s*:\s*([A-D])\b").unwrap());

/// Separator between the question body and its options.
pub static OPTIONS_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Options\s*:\s*").unwrap());

/// An option label `A.`–`D.` at the start of the text or after whitespace.
pub static OPTION_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)([A-D])\.").unwrap());

/// Build the pattern for a `[TAG … yyyy …]` year tag.
///
/// Group 1 is the first 4-digit run inside the brackets.
pub fn year_tag(tag: &str) -> Regex {
    let pattern = format!(r"(?i)\[{}[^\]]*?(\d{{4}})[^\]]*\]", regex::escape(tag));
    // `tag` is escaped, so the pattern is always well-formed.
    Regex::new(&pattern).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_marker_accepts_optional_space() {
        assert_eq!(&QUESTION_MARKER.captures("Question12 x").unwrap()[1], "12");
        assert_eq!(&QUESTION_MARKER.captures("Question 7 x").unwrap()[1], "7");
        assert!(QUESTION_MARKER.captures("Questions about").is_none());
    }

    #[test]
    fn answer_label_ignores_words() {
        assert!(ANSWER_LABEL.captures("Answer: Because it is").is_none());
        assert_eq!(&ANSWER_LABEL.captures("answer :c").unwrap()[1], "c");
    }

    #[test]
    fn option_label_needs_boundary() {
        let labels: Vec<&str> = OPTION_LABEL
            .captures_iter("A. x B. yC. z")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn year_tag_variants() {
        let re = year_tag("NEET");
        assert_eq!(&re.captures("[NEET 2019]").unwrap()[1], "2019");
        assert_eq!(&re.captures("[NEET-2016 Phase II]").unwrap()[1], "2016");
        assert_eq!(&re.captures("[neet (Odisha) 2019]").unwrap()[1], "2019");
        assert!(re.captures("[AIIMS 2019]").is_none());
        assert!(re.captures("[NEET]").is_none());
    }

    #[test]
    fn year_tag_escapes_tag() {
        let re = year_tag("JEE.Main");
        assert!(re.is_match("[JEE.Main 2021]"));
        assert!(!re.is_match("[JEExMain 2021]"));
    }
}
