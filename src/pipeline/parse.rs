//! Record parsing: turn one question chunk into a validated [`Record`].
//!
//! A chunk looks roughly like
//!
//! ```text
//! Question14 Which gas … [NEET 2019] Options: A. N2 B. O2 C. CO2 D. H2 Answer: C Solution: …
//! ```
//!
//! and parsing peels it apart in a fixed order. Each step removes text that
//! would otherwise confuse the next one:
//!
//! 1. Drop `Solution:` and everything after it (explanations often quote
//!    option labels and answer letters).
//! 2. Capture the first `Answer: X` and remove every answer label.
//! 3. Drop the leading `Question<N>` marker; the printed number is not trusted.
//! 4. Capture and remove the year tag.
//! 5. Split the body on the single `Options:` label.
//! 6. Read the option bodies between the labels `A.` … `D.`.
//!
//! Chunks that cannot yield exactly four options are rejected with
//! a [`RejectionReason`]. Accepted chunks are numbered densely from 1 by
//! [`RecordParser::parse_all`].

use crate::error::RejectionReason;
use crate::output::{Answer, Record, Rejection};
use crate::patterns::{
    year_tag, ANSWER_LABEL, LEADING_QUESTION_MARKER, OPTIONS_LABEL, OPTION_LABEL, SOLUTION_LABEL,
};
use crate::pipeline::chunk::Chunk;
use crate::pipeline::filter;
use regex::Regex;
use tracing::debug;

/// Default tag word of year annotations such as `[NEET 2019]`.
pub const DEFAULT_YEAR_TAG: &str = "NEET";

/// The fields of one parsed chunk, before it is numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChunk {
    pub question: String,
    pub options: [String; 4],
    pub answer: Answer,
    pub year: Option<String>,
}

impl ParsedChunk {
    pub fn into_record(self, sequence_number: usize) -> Record {
        Record {
            sequence_number,
            question: self.question,
            options: self.options,
            answer: self.answer,
            year: self.year,
        }
    }
}

/// Accepted records and rejected chunks of one pass over a document.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<Record>,
    pub rejected: Vec<Rejection>,
}

/// Parses question chunks. Holds the compiled year-tag pattern.
#[derive(Debug, Clone)]
pub struct RecordParser {
    year_tag: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR_TAG)
    }
}

impl RecordParser {
    /// Create a parser recognising `[<tag> … yyyy]` year annotations.
    pub fn new(tag: &str) -> Self {
        Self {
            year_tag: year_tag(tag),
        }
    }

    /// Filter and parse every chunk, numbering accepted records 1, 2, 3, …
    pub fn parse_all(&self, chunks: &[Chunk]) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for chunk in chunks {
            let parsed = filter::check(chunk).and_then(|c| self.parse_chunk(c));
            match parsed {
                Ok(fields) => {
                    let n = outcome.records.len() + 1;
                    outcome.records.push(fields.into_record(n));
                }
                Err(reason) => {
                    debug!(
                        "Chunk {} (printed Question{}): rejected, {}",
                        chunk.index,
                        chunk
                            .source_number
                            .map(|n| n.to_string())
                            .unwrap_or_else(|| "?".into()),
                        reason
                    );
                    outcome.rejected.push(Rejection {
                        chunk_index: chunk.index,
                        source_number: chunk.source_number,
                        reason,
                    });
                }
            }
        }

        outcome
    }

    /// Parse a single chunk. Does not apply the image-only filter.
    pub fn parse_chunk(&self, chunk: &Chunk) -> Result<ParsedChunk, RejectionReason> {
        let text = truncate_at_solution(&chunk.text);
        let (answer, text) = take_answer(text);
        let text = LEADING_QUESTION_MARKER.replace(text.trim_start(), "");
        let (year, body) = self.take_year(&text);

        let parts: Vec<&str> = OPTIONS_LABEL.split(&body).collect();
        let (question, options_text) = match parts.as_slice() {
            [question, options] => (question, options),
            [_] => return Err(RejectionReason::MissingOptionsLabel),
            _ => {
                return Err(RejectionReason::RepeatedOptionsLabel { parts: parts.len() });
            }
        };

        Ok(ParsedChunk {
            question: question.trim().to_string(),
            options: extract_options(options_text)?,
            answer,
            year,
        })
    }

    /// Capture the first year tag and remove every tag from `text`.
    fn take_year(&self, text: &str) -> (Option<String>, String) {
        let year = self
            .year_tag
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
        match year {
            Some(_) => (year, squeeze(&self.year_tag.replace_all(text, " "))),
            None => (None, text.to_string()),
        }
    }
}

/// Cut the chunk at its first `Solution:` label.
fn truncate_at_solution(text: &str) -> &str {
    match SOLUTION_LABEL.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Capture the first answer letter and strip every answer label.
fn take_answer(text: &str) -> (Answer, String) {
    let answer = ANSWER_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(Answer::from_letter)
        .unwrap_or(Answer::Unknown);
    let stripped = squeeze(&ANSWER_LABEL.replace_all(text, " "));
    (answer, stripped)
}

/// Read the option bodies that follow the `Options:` label.
///
/// Every `A.`–`D.` label at the start of the text or after whitespace is a
/// boundary. A body runs from its label to the next label (or the end of
/// the text) and is trimmed; an empty body is kept as `""`. Bodies are
/// returned in the order they appear. Anything other than exactly four
/// labels rejects the chunk.
fn extract_options(text: &str) -> Result<[String; 4], RejectionReason> {
    // (start of the label match, start of the body)
    let spans: Vec<(usize, usize)> = OPTION_LABEL
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    if spans.len() != 4 {
        return Err(RejectionReason::OptionCount { found: spans.len() });
    }

    let mut options: [String; 4] = Default::default();
    for (i, &(_, body_start)) in spans.iter().enumerate() {
        let body_end = spans.get(i + 1).map(|&(next, _)| next).unwrap_or(text.len());
        options[i] = text[body_start..body_end].trim().to_string();
    }

    Ok(options)
}

/// Collapse the double spaces left behind when a label is cut out.
fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, text: &str) -> Chunk {
        Chunk {
            index,
            source_number: Some(index as u64),
            text: text.to_string(),
        }
    }

    fn parse(text: &str) -> Result<ParsedChunk, RejectionReason> {
        RecordParser::default().parse_chunk(&chunk(1, text))
    }

    #[test]
    fn parses_basic_question() {
        let p = parse("Question1 What is 2+2? Options: A. 3 B. 4 C. 5 D. 6 Answer: B").unwrap();
        assert_eq!(p.question, "What is 2+2?");
        assert_eq!(p.options, ["3", "4", "5", "6"].map(String::from));
        assert_eq!(p.answer, Answer::B);
        assert_eq!(p.year, None);
    }

    #[test]
    fn missing_answer_is_unknown() {
        let p = parse("Question1 q Options: A. a B. b C. c D. d").unwrap();
        assert_eq!(p.answer, Answer::Unknown);
    }

    #[test]
    fn solution_text_is_discarded_before_answer() {
        let p = parse(
            "Question7 Pick one Options: A. w B. x C. y D. z Solution: A. is wrong, Answer: C",
        )
        .unwrap();
        assert_eq!(p.options[3], "z");
        // The only answer label sat inside the solution.
        assert_eq!(p.answer, Answer::Unknown);
    }

    #[test]
    fn answer_before_solution_is_kept() {
        let p = parse("Question7 q Options: A. w B. x C. y D. z Answer: c Solution: Answer: A")
            .unwrap();
        assert_eq!(p.answer, Answer::C);
        assert_eq!(p.options[3], "z");
    }

    #[test]
    fn year_tag_is_extracted_and_stripped() {
        let p = parse(
            "Question3 Which gas? [NEET 2019] Options: A. N2 B. O2 C. CO2 D. H2 Answer: C",
        )
        .unwrap();
        assert_eq!(p.year.as_deref(), Some("2019"));
        assert_eq!(p.question, "Which gas?");
    }

    #[test]
    fn year_tag_mid_question_leaves_single_space() {
        let p = parse("Question3 Which [NEET-II 2016] gas? Options: A. a B. b C. c D. d").unwrap();
        assert_eq!(p.question, "Which gas?");
        assert_eq!(p.year.as_deref(), Some("2016"));
    }

    #[test]
    fn trailing_year_tag_does_not_leak_into_option_d() {
        let p = parse("Question3 q Options: A. a B. b C. c D. d [NEET 2020]").unwrap();
        assert_eq!(p.options[3], "d");
        assert_eq!(p.year.as_deref(), Some("2020"));
    }

    #[test]
    fn custom_year_tag() {
        let parser = RecordParser::new("JEE");
        let p = parser
            .parse_chunk(&chunk(1, "Question1 q [JEE Main 2021] Options: A. a B. b C. c D. d"))
            .unwrap();
        assert_eq!(p.year.as_deref(), Some("2021"));
        // NEET tags are ordinary text for a JEE parser.
        let p = parser
            .parse_chunk(&chunk(1, "Question1 q [NEET 2021] Options: A. a B. b C. c D. d"))
            .unwrap();
        assert_eq!(p.year, None);
        assert_eq!(p.question, "q [NEET 2021]");
    }

    #[test]
    fn missing_options_label_is_rejected() {
        assert_eq!(
            parse("Question1 q A. a B. b C. c D. d"),
            Err(RejectionReason::MissingOptionsLabel)
        );
    }

    #[test]
    fn repeated_options_label_is_rejected() {
        assert_eq!(
            parse("Question1 q Options: A. a B. b Options: C. c D. d"),
            Err(RejectionReason::RepeatedOptionsLabel { parts: 3 })
        );
    }

    #[test]
    fn three_options_are_rejected() {
        assert_eq!(
            parse("Question1 q Options: A. a B. b C. c"),
            Err(RejectionReason::OptionCount { found: 3 })
        );
    }

    #[test]
    fn empty_option_is_kept() {
        let p = parse("Question1 q Options: A. 1 B. C. c D. d Answer: A").unwrap();
        assert_eq!(p.options, ["1", "", "c", "d"].map(String::from));
        assert_eq!(p.answer, Answer::A);
    }

    #[test]
    fn repeated_label_is_rejected() {
        assert_eq!(
            parse("Question1 q Options: A. x A. y B. b C. c D. d Answer: A"),
            Err(RejectionReason::OptionCount { found: 5 })
        );
        // A label inside an option's text is still a boundary.
        assert_eq!(
            parse("Question1 q Options: A. Vitamin B. complex B. b C. c D. d"),
            Err(RejectionReason::OptionCount { found: 5 })
        );
    }

    #[test]
    fn options_keep_source_order() {
        let p = parse("Question1 q Options: A. a C. c B. b D. d").unwrap();
        assert_eq!(p.options, ["a", "c", "b", "d"].map(String::from));
    }

    #[test]
    fn glued_label_is_text() {
        let p = parse("Question1 q Options: A. 1.5B. B. 2 C. 3 D. 4").unwrap();
        assert_eq!(p.options[0], "1.5B.");
    }

    #[test]
    fn options_label_is_case_insensitive() {
        let p = parse("Question1 q OPTIONS : A. a B. b C. c D. d").unwrap();
        assert_eq!(p.question, "q");
    }

    #[test]
    fn parse_all_numbers_densely() {
        let chunks = vec![
            chunk(1, "Question10 a Options: A. 1 B. 2 C. 3 D. 4 Answer: A"),
            chunk(2, "Question11 b Options: A. B. C. D."),
            chunk(3, "Question12 c no options"),
            chunk(4, "Question40 d Options: A. 1 B. 2 C. 3 D. 4 Answer: D"),
        ];
        let outcome = RecordParser::default().parse_all(&chunks);

        let numbers: Vec<usize> = outcome.records.iter().map(|r| r.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(outcome.records[1].question, "d");

        let reasons: Vec<&RejectionReason> = outcome.rejected.iter().map(|r| &r.reason).collect();
        assert_eq!(
            reasons,
            vec![&RejectionReason::ImageOnly, &RejectionReason::MissingOptionsLabel]
        );
        assert_eq!(outcome.rejected[0].chunk_index, 2);
        assert_eq!(outcome.rejected[1].source_number, Some(3));
    }
}
