//! Configuration types for MCQ extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The defaults reproduce the classic
//! pipeline: five attempts, every question marker counted towards the
//! target, and `[NEET yyyy]` year tags.

use crate::error::McqError;
use crate::pipeline::parse::DEFAULT_YEAR_TAG;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for extracting records from one document.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use mcq_extract::{ConvergenceTarget, ExtractionConfig};
///
/// let config = ExtractionConfig::builder()
///     .max_attempts(3)
///     .target(ConvergenceTarget::ParseableMarkers)
///     .year_tag("JEE")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Upper bound on pipeline attempts. Default: 5.
    ///
    /// The pipeline is deterministic over a fixed input, so extra attempts
    /// only matter when the extractor feeding it is not. The budget bounds
    /// the loop either way.
    pub max_attempts: u32,

    /// Which count the loop must reach to converge. Default:
    /// [`ConvergenceTarget::AllMarkers`].
    pub target: ConvergenceTarget,

    /// Tag word of year annotations (`[NEET 2019]`). Default: `"NEET"`.
    pub year_tag: String,

    /// Optional per-attempt progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            target: ConvergenceTarget::default(),
            year_tag: DEFAULT_YEAR_TAG.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("max_attempts", &self.max_attempts)
            .field("target", &self.target)
            .field("year_tag", &self.year_tag)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.max_attempts = n;
        self
    }

    pub fn target(mut self, target: ConvergenceTarget) -> Self {
        self.config.target = target;
        self
    }

    pub fn year_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.year_tag = tag.into();
        self
    }

    /// Register a callback for per-attempt progress events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, McqError> {
        let c = &self.config;
        if c.max_attempts == 0 {
            return Err(McqError::InvalidConfig("max_attempts must be ≥ 1".into()));
        }
        if c.year_tag.is_empty()
            || !c
                .year_tag
                .chars()
                .all(|ch| ch.is_alphanumeric() || ch == '-' || ch == '.')
        {
            return Err(McqError::InvalidConfig(format!(
                "year tag must be a non-empty word (letters, digits, '-', '.'), got {:?}",
                c.year_tag
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The count an extraction must produce to be accepted.
///
/// Image-only questions are counted as markers but can never become
/// records. Under `AllMarkers` a paper with even one such question never
/// converges and always spends its full attempt budget before its partial
/// result is accepted. `ParseableMarkers` discounts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceTarget {
    /// Every `Question<N>` marker must yield a record. (default)
    #[default]
    AllMarkers,
    /// Every marker except image-only questions must yield a record.
    ParseableMarkers,
}

impl ConvergenceTarget {
    /// Target count for a pass with `markers` chunks, `image_only` of which
    /// were filtered out.
    pub fn count(&self, markers: usize, image_only: usize) -> usize {
        match self {
            ConvergenceTarget::AllMarkers => markers,
            ConvergenceTarget::ParseableMarkers => markers.saturating_sub(image_only),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.max_attempts, 5);
        assert_eq!(c.target, ConvergenceTarget::AllMarkers);
        assert_eq!(c.year_tag, "NEET");
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = ExtractionConfig::builder().max_attempts(0).build().unwrap_err();
        assert!(matches!(err, McqError::InvalidConfig(_)));
    }

    #[test]
    fn bad_year_tag_rejected() {
        for tag in ["", "NEET 2019", "a]b"] {
            assert!(
                ExtractionConfig::builder().year_tag(tag).build().is_err(),
                "tag {tag:?} should be rejected"
            );
        }
        assert!(ExtractionConfig::builder().year_tag("JEE-Main").build().is_ok());
    }

    #[test]
    fn target_counts() {
        assert_eq!(ConvergenceTarget::AllMarkers.count(10, 2), 10);
        assert_eq!(ConvergenceTarget::ParseableMarkers.count(10, 2), 8);
        assert_eq!(ConvergenceTarget::ParseableMarkers.count(0, 0), 0);
    }

    #[test]
    fn debug_hides_callback() {
        let c = ExtractionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ExtractionProgressCallback>"), "got: {dbg}");
    }
}
