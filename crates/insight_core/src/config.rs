//! Capture interpreter configuration.
//!
//! # Responsibility
//! - Carry the caller's wall-clock offset so "today" and "at 2pm" resolve
//!   in local time.
//! - Parse and validate configuration coming across the FFI boundary as JSON.
//!
//! # Invariants
//! - `utc_offset_minutes` is within `-720..=840` once validated.
//! - An anchor is only built for `now_ms` within `MIN_NOW_MS..=MAX_NOW_MS`.
//! - Missing JSON fields fall back to `CaptureConfig::default()`.

use crate::nlp::tokens::{TimeAnchor, MAX_NOW_MS, MIN_NOW_MS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Smallest real-world UTC offset (UTC-12:00).
pub const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
/// Largest real-world UTC offset (UTC+14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Options for one capture parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    /// Minutes added to UTC to obtain local time. `0` means UTC.
    pub utc_offset_minutes: i32,
}

impl CaptureConfig {
    pub fn with_utc_offset_minutes(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    /// Parses a JSON config, e.g. `{"utcOffsetMinutes": -300}`.
    ///
    /// Blank input yields the default config.
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed JSON.
    /// - `ConfigError::UtcOffsetOutOfRange` when the offset is not a real one.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::UtcOffsetOutOfRange(self.utc_offset_minutes));
        }
        Ok(())
    }

    /// Builds the time anchor used for every phrase of one parse call.
    ///
    /// # Errors
    /// - `ConfigError::UtcOffsetOutOfRange` for an unvalidated bad offset.
    /// - `ConfigError::NowOutOfRange` when `now_ms` falls outside years 1..=9999.
    pub fn anchor(&self, now_ms: i64) -> Result<TimeAnchor, ConfigError> {
        self.validate()?;
        TimeAnchor::new(now_ms, self.utc_offset_minutes).ok_or(ConfigError::NowOutOfRange(now_ms))
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Offset outside `-720..=840` minutes.
    UtcOffsetOutOfRange(i32),
    /// Caller instant outside `MIN_NOW_MS..=MAX_NOW_MS`.
    NowOutOfRange(i64),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UtcOffsetOutOfRange(minutes) => write!(
                f,
                "utcOffsetMinutes ({minutes}) must be within {MIN_UTC_OFFSET_MINUTES}..={MAX_UTC_OFFSET_MINUTES}"
            ),
            Self::NowOutOfRange(now_ms) => write!(
                f,
                "nowMs ({now_ms}) must be within {MIN_NOW_MS}..={MAX_NOW_MS}"
            ),
            Self::Parse(err) => write!(f, "invalid capture config json: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UtcOffsetOutOfRange(_) | Self::NowOutOfRange(_) => None,
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
