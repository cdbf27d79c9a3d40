//! Flutter bridge crate for the Insight capture engine.

pub mod api;
