//! Chunking: split normalised text into one span per question.
//!
//! Chunking is a two-phase lexer over the output of
//! [`crate::pipeline::normalize::normalize`]:
//!
//! 1. **Marker scan**: find every `Question<N>` marker and record its byte
//!    offset and number.
//! 2. **Span split**: each chunk runs from its marker to the next marker
//!    (or the end of the text). Whatever precedes the first marker is front
//!    matter (titles, instructions) and is discarded.
//!
//! The chunk count is the document's *expected* question count: it is taken
//! before any chunk is filtered or parsed.

use crate::patterns::QUESTION_MARKER;
use serde::Serialize;

/// A question marker found during the scan phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Byte offset of the marker in the normalised text.
    pub offset: usize,
    /// Number printed in the source. `None` if it does not fit in a `u64`.
    pub number: Option<u64>,
}

/// A span of text believed to hold exactly one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 1-based position of the chunk's marker among all markers.
    pub index: usize,
    /// Question number as printed in the source. Informational only.
    pub source_number: Option<u64>,
    /// Trimmed chunk text, starting with its `Question<N>` marker.
    pub text: String,
}

/// Find every question marker in `normalized`, in order.
pub fn scan_markers(normalized: &str) -> Vec<Marker> {
    QUESTION_MARKER
        .captures_iter(normalized)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Marker {
                offset: whole.start(),
                number: caps.get(1).and_then(|n| n.as_str().parse().ok()),
            })
        })
        .collect()
}

/// Split `normalized` into chunks at the given markers.
///
/// `markers` must be sorted by offset and lie on char boundaries, which
/// [`scan_markers`] guarantees.
pub fn split_spans(normalized: &str, markers: &[Marker]) -> Vec<Chunk> {
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers
                .get(i + 1)
                .map(|next| next.offset)
                .unwrap_or(normalized.len());
            Chunk {
                index: i + 1,
                source_number: marker.number,
                text: normalized[marker.offset..end].trim().to_string(),
            }
        })
        .collect()
}

/// Scan and split in one call.
pub fn chunk(normalized: &str) -> Vec<Chunk> {
    let markers = scan_markers(normalized);
    split_spans(normalized, &markers)
}
