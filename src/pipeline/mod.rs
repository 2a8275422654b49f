//! Pipeline stages for text-to-record extraction.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalize ──▶ chunk ──▶ filter ──▶ parse
//! (text)    (cleanup)    (split)   (images)   (records)
//! ```
//!
//! 1. [`input`]: obtain raw text through a [`input::TextExtractor`]
//! 2. [`normalize`]: strip page labels and glyphs, collapse whitespace
//! 3. [`chunk`]: scan `Question<N>` markers, split into one chunk each
//! 4. [`filter`]: reject image-only questions
//! 5. [`parse`]: extract question, options, answer and year; renumber
//!
//! The stages are driven, and re-driven, by [`crate::converge`].

pub mod chunk;
pub mod filter;
pub mod input;
pub mod normalize;
pub mod parse;
