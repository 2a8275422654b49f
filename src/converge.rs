//! Convergence loop: run the pipeline until the record count is right.
//!
//! A question paper announces how many questions it has through its
//! `Question<N>` markers. One pipeline pass, [`attempt`], counts those markers
//! and parses the chunks between them. [`run`] repeats passes until the
//! number of records produced equals the target count, or until the attempt
//! budget is spent:
//!
//! ```text
//! Attempting ──produced == target──▶ Converged   (records accepted)
//!     │
//!     └──budget spent──────────────▶ Exhausted   (last attempt accepted)
//! ```
//!
//! Exhaustion is best-effort degradation, not an error: the last attempt's
//! records are returned and the mismatch stays visible through
//! [`Extraction::mismatch`] and a `warn!` log line.
//!
//! Each attempt is a pure function of the input text, so the controller
//! carries nothing between attempts but the attempt index.

use crate::config::{ConvergenceTarget, ExtractionConfig};
use crate::output::{ConvergenceState, Extraction, ExtractionStats, Record, Rejection};
use crate::pipeline::chunk::chunk;
use crate::pipeline::normalize::normalize;
use crate::pipeline::parse::RecordParser;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The outcome of one full pipeline pass.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Question markers found (the expected count, before filtering).
    pub markers: usize,
    pub records: Vec<Record>,
    pub rejected: Vec<Rejection>,
}

impl Attempt {
    pub fn produced(&self) -> usize {
        self.records.len()
    }

    /// Chunks dropped by the image-only filter.
    pub fn image_only(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| r.reason.is_image_only())
            .count()
    }

    /// Chunks rejected by the record parser.
    pub fn malformed(&self) -> usize {
        self.rejected.len() - self.image_only()
    }

    pub fn target(&self, target: ConvergenceTarget) -> usize {
        target.count(self.markers, self.image_only())
    }
}

/// Run normalise → chunk → filter → parse once over `raw`.
pub fn attempt(raw: &str, parser: &RecordParser) -> Attempt {
    let normalized = normalize(raw);
    let chunks = chunk(&normalized);
    let outcome = parser.parse_all(&chunks);
    Attempt {
        markers: chunks.len(),
        records: outcome.records,
        rejected: outcome.rejected,
    }
}

/// Run attempts until convergence or until `config.max_attempts` is spent.
///
/// Always returns: the loop body runs at most `max(config.max_attempts, 1)`
/// times.
pub fn run(raw: &str, config: &ExtractionConfig) -> Extraction {
    let start = Instant::now();
    let parser = RecordParser::new(&config.year_tag);
    let max_attempts = config.max_attempts.max(1);
    let cb = config.progress_callback.as_ref();

    if let Some(cb) = cb {
        cb.on_extraction_start(max_attempts);
    }

    let mut attempt_no = 1;
    loop {
        if let Some(cb) = cb {
            cb.on_attempt_start(attempt_no, max_attempts);
        }

        let pass = attempt(raw, &parser);
        let target = pass.target(config.target);
        let produced = pass.produced();
        debug!(
            "Attempt {}/{}: {} markers, target {}, {} records, {} rejected",
            attempt_no,
            max_attempts,
            pass.markers,
            target,
            produced,
            pass.rejected.len()
        );

        if let Some(cb) = cb {
            cb.on_attempt_complete(attempt_no, target, produced);
        }

        if produced == target {
            info!("Converged on attempt {}: {} questions", attempt_no, produced);
            return finish(pass, ConvergenceState::Converged, attempt_no, config, start);
        }

        if attempt_no == 1 && config.target == ConvergenceTarget::AllMarkers {
            let image_only = pass.image_only();
            if image_only > 0 && produced + image_only == target {
                warn!(
                    "{} image-only question(s) count towards the target but can never be \
                     parsed; this document cannot converge under ConvergenceTarget::AllMarkers",
                    image_only
                );
            }
        }

        if attempt_no >= max_attempts {
            warn!(
                "Expected {} questions but extracted {} after {} attempts; keeping partial result",
                target, produced, attempt_no
            );
            return finish(pass, ConvergenceState::Exhausted, attempt_no, config, start);
        }

        warn!(
            "Attempt {}/{}: expected {}, got {}; retrying",
            attempt_no, max_attempts, target, produced
        );
        attempt_no += 1;
    }
}

fn finish(
    pass: Attempt,
    state: ConvergenceState,
    attempts: u32,
    config: &ExtractionConfig,
    start: Instant,
) -> Extraction {
    if let Some(cb) = config.progress_callback.as_ref() {
        cb.on_extraction_complete(state, attempts);
    }

    let stats = ExtractionStats {
        state,
        markers: pass.markers,
        target: pass.target(config.target),
        produced: pass.produced(),
        image_only: pass.image_only(),
        malformed: pass.malformed(),
        attempts,
        max_attempts: config.max_attempts.max(1),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    Extraction {
        records: pass.records,
        rejected: pass.rejected,
        stats,
    }
}
