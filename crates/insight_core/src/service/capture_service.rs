//! Capture parsing use-case service.
//!
//! # Responsibility
//! - Hold a validated `CaptureConfig` and expose the parse entry points.
//! - Log per-call metadata (lengths and counts, never capture text).
//!
//! # Invariants
//! - A constructed service always carries a valid config.
//! - Calls with a `now_ms` outside `MIN_NOW_MS..=MAX_NOW_MS` fail before parsing.
//! - Service calls are pure parses; nothing is persisted.

use crate::config::{CaptureConfig, ConfigError};
use crate::model::capture::{ParseBlocksResult, ParseNaturalResult};
use crate::nlp::{parse_capture_natural_with_config, parse_capture_with_blocks_with_config};
use log::{debug, warn};

/// Use-case wrapper around the capture interpreter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureService {
    config: CaptureConfig,
}

impl CaptureService {
    /// Creates a service after validating `config`.
    pub fn new(config: CaptureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Creates a service from a JSON config; blank input means defaults.
    pub fn from_json(raw_config: &str) -> Result<Self, ConfigError> {
        CaptureConfig::from_json(raw_config).map(|config| Self { config })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Parses a capture into flat task/event lists.
    ///
    /// # Errors
    /// - `ConfigError::NowOutOfRange` when `now_ms` cannot be anchored.
    pub fn parse(&self, raw_text: &str, now_ms: i64) -> Result<ParseNaturalResult, ConfigError> {
        self.check_now("natural", now_ms)?;
        let result = parse_capture_natural_with_config(raw_text, now_ms, &self.config);
        debug!(
            "event=capture_service_parse module=service status=ok mode=natural input_chars={} tasks={} events={}",
            raw_text.chars().count(),
            result.tasks.len(),
            result.events.len()
        );
        Ok(result)
    }

    /// Parses a capture block-by-block.
    ///
    /// # Errors
    /// - Same as [`CaptureService::parse`].
    pub fn parse_blocks(
        &self,
        raw_text: &str,
        now_ms: i64,
    ) -> Result<ParseBlocksResult, ConfigError> {
        self.check_now("blocks", now_ms)?;
        let result = parse_capture_with_blocks_with_config(raw_text, now_ms, &self.config);
        debug!(
            "event=capture_service_parse module=service status=ok mode=blocks input_chars={} blocks={} tasks={} events={}",
            raw_text.chars().count(),
            result.blocks.len(),
            result.tasks.len(),
            result.events.len()
        );
        Ok(result)
    }

    /// Parses a capture, then drops events for phrases another extractor owns.
    ///
    /// Specialized extractors (e.g. a workout parser) claim phrases by their
    /// source text; their output takes precedence over the generic event.
    pub fn parse_excluding<S: AsRef<str>>(
        &self,
        raw_text: &str,
        now_ms: i64,
        claimed_phrases: &[S],
    ) -> Result<ParseNaturalResult, ConfigError> {
        self.parse(raw_text, now_ms)
            .map(|result| result.without_claimed(claimed_phrases))
    }

    fn check_now(&self, mode: &str, now_ms: i64) -> Result<(), ConfigError> {
        self.config
            .anchor(now_ms)
            .map(|_| ())
            .inspect_err(|_| {
                warn!("event=capture_service_parse module=service status=rejected mode={mode}")
            })
    }
}
