//! Output types and JSONL rendering.
//!
//! A [`Record`] serialises to exactly one line of the JSONL output:
//!
//! ```text
//! {"q":"1","question":"What is 2+2?","options":["3","4","5","6"],"answer":"B","year":"2019"}
//! ```
//!
//! `q` is the dense sequence number rendered as a string, and `year` is
//! omitted when no year tag was found. `serde_json` writes non-ASCII
//! characters literally, so Greek letters and units survive unescaped.

use crate::error::{McqError, RejectionReason};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// The correct option of a question, or `unknown` when the paper gave none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    A,
    B,
    C,
    D,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Answer {
    /// Map an option letter (either case) to an answer.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Answer::A),
            'B' => Some(Answer::B),
            'C' => Some(Answer::C),
            'D' => Some(Answer::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::A => "A",
            Answer::B => "B",
            Answer::C => "C",
            Answer::D => "D",
            Answer::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully parsed multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Dense 1-based position among accepted records. Never the number
    /// printed in the source.
    #[serde(rename = "q", with = "sequence_as_string")]
    pub sequence_number: usize,
    pub question: String,
    /// Option texts for labels A–D, in order.
    pub options: [String; 4],
    pub answer: Answer,
    /// 4-digit year from the question's year tag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

mod sequence_as_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &usize, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(n)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A chunk that did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// 1-based marker ordinal of the chunk.
    pub chunk_index: usize,
    /// Question number printed in the source, when parseable.
    pub source_number: Option<u64>,
    pub reason: RejectionReason,
}

/// Terminal state of the convergence loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceState {
    /// The record count matched the target.
    Converged,
    /// The retry budget ran out; the last attempt was kept.
    Exhausted,
}

/// Expected vs produced counts of an extraction that did not converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub expected: usize,
    pub produced: usize,
}

/// Aggregate statistics for one document's extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub state: ConvergenceState,
    /// Question markers found in the text.
    pub markers: usize,
    /// Count the loop tried to reach (see [`crate::config::ConvergenceTarget`]).
    pub target: usize,
    /// Records produced by the accepted attempt.
    pub produced: usize,
    /// Chunks dropped by the image-only filter.
    pub image_only: usize,
    /// Chunks rejected by the record parser.
    pub malformed: usize,
    pub attempts: u32,
    pub max_attempts: u32,
    pub total_duration_ms: u64,
}

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub rejected: Vec<Rejection>,
    pub stats: ExtractionStats,
}

impl Extraction {
    pub fn is_converged(&self) -> bool {
        self.stats.state == ConvergenceState::Converged
    }

    /// `Some` when the loop exhausted its budget without matching the target.
    pub fn mismatch(&self) -> Option<Mismatch> {
        match self.stats.state {
            ConvergenceState::Converged => None,
            ConvergenceState::Exhausted => Some(Mismatch {
                expected: self.stats.target,
                produced: self.stats.produced,
            }),
        }
    }

    /// Treat a convergence mismatch as an error.
    pub fn into_result(self) -> Result<Self, McqError> {
        match self.mismatch() {
            None => Ok(self),
            Some(m) => Err(McqError::ConvergenceMismatch {
                expected: m.expected,
                produced: m.produced,
                attempts: self.stats.attempts,
            }),
        }
    }

    /// Render the records as JSONL.
    pub fn to_jsonl(&self) -> Result<String, McqError> {
        to_jsonl(&self.records)
    }
}

/// Render records as newline-delimited JSON, one object per line.
pub fn to_jsonl(records: &[Record]) -> Result<String, McqError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Stream records as JSONL into `writer`.
pub fn write_jsonl<W: Write>(records: &[Record], mut writer: W) -> io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Write records as JSONL to `path`, atomically.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// crash never leaves a truncated JSONL file behind. Parent directories are
/// created as needed.
pub fn write_jsonl_file(records: &[Record], path: &Path) -> Result<(), McqError> {
    let write_err = |source: io::Error| McqError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    write_jsonl(records, io::BufWriter::new(tmp.as_file_mut())).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Render records in the cleaned, renumbered one-line-per-question form:
///
/// ```text
/// Question1 What is 2+2? Options: A. 3 B. 4 C. 5 D. 6 Answer: B
/// ```
///
/// Year tags are not reproduced, and the `Answer:` clause is left out when
/// the answer is unknown.
pub fn cleaned_text(records: &[Record]) -> String {
    let mut out = String::new();
    for r in records {
        let [a, b, c, d] = &r.options;
        out.push_str(&format!(
            "Question{} {} Options: A. {} B. {} C. {} D. {}",
            r.sequence_number, r.question, a, b, c, d
        ));
        if r.answer != Answer::Unknown {
            out.push_str(&format!(" Answer: {}", r.answer));
        }
        out.push('\n');
    }
    out
}
