//! Natural-language capture pipeline.
//!
//! # Responsibility
//! - Segment free text into phrases, resolve times, classify intent and
//!   emit structured tasks/events.
//! - Extract block-scoped entities (trackers, people, tags, contexts,
//!   locations).
//!
//! # Invariants
//! - Every entry point is a pure function of `(raw_text, now_ms, config)`.
//! - No module-level mutable state; regex statics are compile-once and
//!   read-only.
//!
//! # Layout
//! - `tokens`: `chrono`-backed day anchoring and small string helpers.
//! - `time`: clock token and range resolution.
//! - `intent`: tense/intent classifiers, day offsets and title cleanup.
//! - `segment`: phrase segmentation.
//! - `entities`: inline token extractors.
//! - `interpreter`: phrase fold producing tasks/events.
//! - `blocks`: divider-aware block parsing.

pub mod blocks;
pub mod entities;
pub mod intent;
pub mod interpreter;
pub mod segment;
pub mod time;
pub mod tokens;

pub use blocks::{parse_capture_with_blocks, parse_capture_with_blocks_with_config};
pub use interpreter::{parse_capture_natural, parse_capture_natural_with_config};
pub use tokens::{MAX_NOW_MS, MIN_NOW_MS};
