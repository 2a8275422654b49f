//! # mcq-extract
//!
//! Turn the extracted text of multiple-choice question papers into
//! structured JSONL records.
//!
//! ## Why this crate?
//!
//! Text pulled out of scanned or typeset question papers is one long,
//! noisy stream: page labels, copyright footers, worked solutions and
//! image-only questions all sit between the questions. This crate finds
//! the question boundaries, parses each question into a validated record
//! with exactly four options, and checks the result against the paper's
//! own numbering before accepting it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Input      read pre-extracted text (or plug in a TextExtractor)
//!  ├─ 2. Normalise  drop [Page N] labels and ©, collapse whitespace
//!  ├─ 3. Chunk      one span per Question<N> marker
//!  ├─ 4. Filter     reject image-only questions
//!  ├─ 5. Parse      question / options / answer / year, renumbered 1..N
//!  └─ 6. Converge   repeat until records == markers, or budget spent
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mcq_extract::{extract_text, ExtractionConfig};
//!
//! let raw = "[Page 1] Question1 What is 2+2? Options: A. 3 B. 4 C. 5 D. 6 Answer: B";
//! let out = extract_text(raw, &ExtractionConfig::default());
//! assert!(out.is_converged());
//! print!("{}", out.to_jsonl().unwrap());
//! // {"q":"1","question":"What is 2+2?","options":["3","4","5","6"],"answer":"B"}
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mcq2jsonl` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mcq-extract = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod converge;
pub mod error;
pub mod extract;
pub mod output;
pub mod patterns;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConvergenceTarget, ExtractionConfig, ExtractionConfigBuilder};
pub use extract::{extract, extract_text, extract_to_file, extract_with};
pub use error::{McqError, RejectionReason};
pub use output::{
    cleaned_text, to_jsonl, write_jsonl, write_jsonl_file, Answer, ConvergenceState, Extraction,
    ExtractionStats, Mismatch, Record, Rejection,
};
pub use pipeline::input::{assemble_pages, PlainTextExtractor, TextExtractor};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
