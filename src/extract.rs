//! Extraction entry points.
//!
//! [`extract_text`] is the synchronous core: raw text in, [`Extraction`]
//! out. The remaining functions add file handling around it:
//!
//! * [`extract_with`] pulls text through any [`TextExtractor`]
//! * [`extract`] reads a text file on the blocking pool
//! * [`extract_to_file`] additionally writes the JSONL output atomically

use crate::config::ExtractionConfig;
use crate::converge;
use crate::error::McqError;
use crate::output::{self, Extraction, ExtractionStats};
use crate::pipeline::input::{PlainTextExtractor, TextExtractor};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extract records from raw document text.
///
/// Never fails: malformed questions are rejected individually and a
/// persistent count mismatch degrades to the last attempt's records.
/// Inspect [`Extraction::mismatch`] or call [`Extraction::into_result`] to
/// decide how strict to be.
pub fn extract_text(raw: &str, config: &ExtractionConfig) -> Extraction {
    info!("Starting extraction ({} bytes of text)", raw.len());
    let extraction = converge::run(raw, config);

    if let Some(m) = extraction.mismatch() {
        warn!(
            "Convergence mismatch: expected {}, produced {} ({} image-only, {} malformed)",
            m.expected, m.produced, extraction.stats.image_only, extraction.stats.malformed
        );
    }
    info!(
        "Extraction complete: {} records in {} attempt(s), {}ms",
        extraction.records.len(),
        extraction.stats.attempts,
        extraction.stats.total_duration_ms
    );
    extraction
}

/// Obtain text for `source` through `extractor`, then extract records.
pub fn extract_with<E: TextExtractor + ?Sized>(
    extractor: &E,
    source: &Path,
    config: &ExtractionConfig,
) -> Result<Extraction, McqError> {
    info!("Reading: {}", source.display());
    let raw = extractor.extract(source)?;
    Ok(extract_text(&raw, config))
}

/// Extract records from a UTF-8 text file.
///
/// File reading and parsing run on tokio's blocking pool.
///
/// # Errors
/// Returns `Err(McqError)` only for fatal errors: file not found,
/// permission denied, invalid UTF-8.
pub async fn extract(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Extraction, McqError> {
    let path: PathBuf = input.as_ref().to_path_buf();
    let config = config.clone();
    tokio::task::spawn_blocking(move || extract_with(&PlainTextExtractor, &path, &config))
        .await
        .map_err(|e| McqError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Extract records from a text file and write them as JSONL to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, McqError> {
    let extraction = extract(input, config).await?;
    let path = output_path.as_ref().to_path_buf();
    let records = extraction.records;

    tokio::task::spawn_blocking(move || output::write_jsonl_file(&records, &path))
        .await
        .map_err(|e| McqError::Internal(format!("Write task panicked: {}", e)))??;

    Ok(extraction.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Serves canned text keyed by path, standing in for an OCR backend.
    struct CannedExtractor(HashMap<PathBuf, String>);

    impl TextExtractor for CannedExtractor {
        fn extract(&self, source: &Path) -> Result<String, McqError> {
            self.0
                .get(source)
                .cloned()
                .ok_or_else(|| McqError::FileNotFound {
                    path: source.to_path_buf(),
                })
        }
    }

    #[test]
    fn extract_with_custom_extractor() {
        let mut docs = HashMap::new();
        docs.insert(
            PathBuf::from("paper.pdf"),
            "Question1 q Options: A. a B. b C. c D. d Answer: A".to_string(),
        );
        let extractor = CannedExtractor(docs);

        let out = extract_with(&extractor, Path::new("paper.pdf"), &ExtractionConfig::default())
            .unwrap();
        assert_eq!(out.records.len(), 1);

        let err = extract_with(&extractor, Path::new("other.pdf"), &ExtractionConfig::default())
            .unwrap_err();
        assert!(matches!(err, McqError::FileNotFound { .. }));
    }

    #[test]
    fn extract_with_dyn_extractor() {
        let extractor: Box<dyn TextExtractor> = Box::new(PlainTextExtractor);
        let err = extract_with(
            extractor.as_ref(),
            Path::new("/definitely/not/here.txt"),
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, McqError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn extract_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("paper.txt");
        std::fs::write(
            &input,
            "[Page 1]\nQuestion1 q\nOptions: A. a B. b C. c D. d\nAnswer: D\n",
        )
        .unwrap();

        let out = extract(&input, &ExtractionConfig::default()).await.unwrap();
        assert!(out.is_converged());
        assert_eq!(out.records[0].options[3], "d");
    }
}
