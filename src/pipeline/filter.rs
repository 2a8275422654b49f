//! Chunk filter: drop questions whose options were images.
//!
//! When a paper prints its options as pictures, text extraction yields only
//! the labels: `Options: A. B. C. D.`. Such a chunk has no option text at
//! all, so it is rejected before parsing and reported as
//! [`RejectionReason::ImageOnly`]. A question with only some options blank
//! is not image-only and parses with empty option strings.

use crate::error::RejectionReason;
use crate::patterns::IMAGE_ONLY_OPTIONS;
use crate::pipeline::chunk::Chunk;

/// Returns `true` when the chunk carries the image-only signature.
pub fn is_image_only(text: &str) -> bool {
    IMAGE_ONLY_OPTIONS.is_match(text)
}

/// Pass a chunk through unchanged, or reject it as image-only.
pub fn check(chunk: &Chunk) -> Result<&Chunk, RejectionReason> {
    if is_image_only(&chunk.text) {
        Err(RejectionReason::ImageOnly)
    } else {
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            index: 1,
            source_number: Some(1),
            text: text.to_string(),
        }
    }

    #[test]
    fn bare_labels_are_image_only() {
        assert!(is_image_only("Question3 Identify the graph Options: A. B. C. D. Answer: B"));
        assert!(is_image_only("Question3 x options : A.B.C.D."));
    }

    #[test]
    fn textual_options_pass() {
        assert!(!is_image_only("Question1 x Options: A. 3 B. 4 C. 5 D. 6"));
        // Three bare labels and one real option is malformed, not image-only.
        assert!(!is_image_only("Question1 x Options: A. 1 B. C. D."));
    }

    #[test]
    fn check_returns_reason() {
        let c = chunk("Question1 Options: A. B. C. D.");
        assert_eq!(check(&c), Err(RejectionReason::ImageOnly));
        let c = chunk("Question1 q Options: A. a B. b C. c D. d");
        assert_eq!(check(&c), Ok(&c));
    }
}
