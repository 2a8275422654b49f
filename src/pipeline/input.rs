//! Input: obtain raw question-paper text for a source document.
//!
//! Converting PDFs and running OCR are outside this crate. Whatever does
//! that work plugs in through [`TextExtractor`]. The bundled
//! [`PlainTextExtractor`] reads text that has already been extracted to a
//! UTF-8 file: either a single annotated blob with `[Page N]` labels, or the
//! form-feed separated pages that `pdftotext` writes.

use crate::error::McqError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Page separator written by `pdftotext`.
const FORM_FEED: char = '\u{000C}';

/// Rule lines of 5+ hyphens that OCR produces from table borders.
static RULE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{5,}").unwrap());

/// Produces the raw text of one source document.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, source: &Path) -> Result<String, McqError>;
}

/// Reads pre-extracted UTF-8 text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, source: &Path) -> Result<String, McqError> {
        let bytes = read_local(source)?;
        let text = String::from_utf8(bytes).map_err(|e| McqError::NotUtf8 {
            path: source.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })?;
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);

        if text.contains(FORM_FEED) {
            let mut pages: Vec<&str> = text.split(FORM_FEED).collect();
            // pdftotext terminates the last page with a form feed too.
            if pages.last().is_some_and(|p| p.trim().is_empty()) {
                pages.pop();
            }
            debug!("{}: {} form-feed pages", source.display(), pages.len());
            Ok(assemble_pages(&pages))
        } else {
            Ok(text.to_string())
        }
    }
}

/// Join per-page text into one document annotated with `[Page N]` labels.
///
/// Each page has its rule lines (5+ hyphens) removed and is trimmed, then
/// written as `\n[Page N]\n<text>\n`.
pub fn assemble_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        let cleaned = RULE_LINE.replace_all(page.as_ref(), "");
        out.push_str(&format!("\n[Page {}]\n{}\n", i + 1, cleaned.trim()));
    }
    out
}

/// Read a local file, mapping I/O failures to typed errors.
fn read_local(path: &Path) -> Result<Vec<u8>, McqError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            debug!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(McqError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(McqError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(McqError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}
