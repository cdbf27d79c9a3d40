//! Core capture engine for Insight.
//! Turns freeform captures into tasks, events, trackers and entities.

pub mod config;
pub mod logging;
pub mod model;
pub mod nlp;
pub mod service;

pub use config::{CaptureConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::capture::{
    CaptureValidationError, EventKind, ParseBlocksResult, ParseNaturalResult, ParsedBlock,
    ParsedEvent, ParsedTask, TaskScope, TaskStatus, TrackerToken,
};
pub use nlp::{
    parse_capture_natural, parse_capture_natural_with_config, parse_capture_with_blocks,
    parse_capture_with_blocks_with_config, MAX_NOW_MS, MIN_NOW_MS,
};
pub use service::capture_service::CaptureService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
