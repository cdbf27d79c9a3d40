//! Output records produced by the capture interpreter.
//!
//! # Responsibility
//! - Define the task/event/block shapes handed to persistence and preview layers.
//! - Keep one serde wire format (camelCase) for every consumer.
//!
//! # Invariants
//! - Records are plain values built fresh per parse call.
//! - Every event satisfies `end_at >= start_at`.

pub mod capture;
