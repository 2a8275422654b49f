//! Progress-callback trait for per-attempt extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to observe
//! the convergence loop: when each attempt starts, what it counted, and how
//! the loop ended. The CLI uses this to drive its progress bar; a batch
//! runner can use it to flag documents that never converge.
//!
//! # Example
//!
//! ```rust
//! use mcq_extract::{ConvergenceState, ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Mismatches {
//!     seen: Mutex<Vec<(usize, usize)>>,
//! }
//!
//! impl ExtractionProgressCallback for Mismatches {
//!     fn on_attempt_complete(&self, _attempt: u32, expected: usize, produced: usize) {
//!         if expected != produced {
//!             self.seen.lock().unwrap().push((expected, produced));
//!         }
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(Mismatches::default()) as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ConvergenceState;
use std::sync::Arc;

/// Called by the convergence loop as it runs.
///
/// Implementations must be `Send + Sync` so a config can be shared by
/// extractions running on different threads. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first attempt.
    ///
    /// # Arguments
    /// * `max_attempts`: the attempt budget
    fn on_extraction_start(&self, max_attempts: u32) {
        let _ = max_attempts;
    }

    /// Called before each attempt (1-indexed).
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called after each attempt.
    ///
    /// # Arguments
    /// * `attempt`: 1-indexed attempt number
    /// * `expected`: the target count for this attempt
    /// * `produced`: records produced by this attempt
    fn on_attempt_complete(&self, attempt: u32, expected: usize, produced: usize) {
        let _ = (attempt, expected, produced);
    }

    /// Called once when the loop stops.
    fn on_extraction_complete(&self, state: ConvergenceState, attempts: u32) {
        let _ = (state, attempts);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
