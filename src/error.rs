//! Error types for the mcq-extract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`McqError`] is **fatal**: extraction cannot proceed at all (input file
//!   missing, not UTF-8, output not writable, invalid configuration).
//!   Returned as `Err(McqError)` from the top-level `extract*` functions.
//!
//! * [`RejectionReason`] is **non-fatal**: a single question chunk could not
//!   become a record (image-only question, no `Options:` label, wrong option
//!   count). Stored in [`crate::output::Rejection`] alongside the accepted
//!   records so callers can audit what was dropped and why.
//!
//! A convergence mismatch is neither: the records are still emitted. Callers
//! that want to treat it as fatal use
//! [`crate::output::Extraction::into_result`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mcq-extract library.
///
/// Chunk-level failures use [`RejectionReason`] and are stored in
/// [`crate::output::Extraction::rejected`] rather than propagated here.
#[derive(Debug, Error)]
pub enum McqError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Text file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but its bytes are not valid UTF-8.
    #[error("File '{path}' is not valid UTF-8 (first bad byte at offset {offset})")]
    NotUtf8 { path: PathBuf, offset: usize },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output JSONL file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialised to JSON.
    #[error("Failed to serialise record: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Convergence ───────────────────────────────────────────────────────
    /// The record count never matched the expected count.
    ///
    /// Only returned by [`crate::output::Extraction::into_result`]; the
    /// extraction entry points degrade to best-effort output instead.
    #[error("Expected {expected} questions but extracted {produced} after {attempts} attempts")]
    ConvergenceMismatch {
        expected: usize,
        produced: usize,
        attempts: u32,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a question chunk was dropped instead of becoming a record.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum RejectionReason {
    /// `Options: A. B. C. D.` with no option text: the options were images.
    #[error("image-only question (bare option labels)")]
    ImageOnly,

    /// No `Options:` label anywhere in the chunk.
    #[error("no 'Options:' label")]
    MissingOptionsLabel,

    /// More than one `Options:` label; the split is ambiguous.
    #[error("'Options:' label splits the chunk into {parts} parts")]
    RepeatedOptionsLabel { parts: usize },

    /// The options text holds more or fewer than four option labels.
    #[error("found {found} option labels, expected 4")]
    OptionCount { found: usize },
}

impl RejectionReason {
    /// `true` for rejections caused by the image-only signature rather than
    /// malformed text.
    pub fn is_image_only(&self) -> bool {
        matches!(self, RejectionReason::ImageOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_mismatch_display() {
        let e = McqError::ConvergenceMismatch {
            expected: 40,
            produced: 38,
            attempts: 5,
        };
        let msg = e.to_string();
        assert!(msg.contains("40"), "got: {msg}");
        assert!(msg.contains("38"), "got: {msg}");
        assert!(msg.contains("5 attempts"), "got: {msg}");
    }

    #[test]
    fn not_utf8_display() {
        let e = McqError::NotUtf8 {
            path: PathBuf::from("paper.txt"),
            offset: 17,
        };
        assert!(e.to_string().contains("paper.txt"));
        assert!(e.to_string().contains("17"));
    }

    #[test]
    fn rejection_display() {
        assert_eq!(
            RejectionReason::OptionCount { found: 5 }.to_string(),
            "found 5 option labels, expected 4"
        );
    }

    #[test]
    fn image_only_classification() {
        assert!(RejectionReason::ImageOnly.is_image_only());
        assert!(!RejectionReason::MissingOptionsLabel.is_image_only());
    }
}
