//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose capture parsing to Dart via FRB as JSON envelopes.
//! - Keep error semantics simple: `ok` flag plus human-readable message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - `payload_json` uses the camelCase wire format of the core model.

use insight_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CaptureService,
};
use log::warn;
use serde::Serialize;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Response envelope for capture parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResponse {
    /// Whether parsing succeeded.
    pub ok: bool,
    /// Serialized `ParseNaturalResult` / `ParseBlocksResult`; empty on failure.
    pub payload_json: String,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CaptureResponse {
    fn success(payload_json: String, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            payload_json,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload_json: String::new(),
            message: message.into(),
        }
    }
}

/// Parses a capture into flat tasks and events.
///
/// Input semantics:
/// - `now_ms`: caller's current epoch milliseconds.
/// - `config_json`: optional `{"utcOffsetMinutes": N}`; empty means UTC.
///
/// # FFI contract
/// - Sync call, CPU-bound, bounded by input caps.
/// - Never panics; invalid config or a `now_ms` outside years 1..=9999
///   yields `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn parse_capture(raw_text: String, now_ms: i64, config_json: String) -> CaptureResponse {
    let parsed = CaptureService::from_json(&config_json)
        .and_then(|service| service.parse(&raw_text, now_ms));
    match parsed {
        Ok(result) => {
            let message = format!(
                "Parsed {} task(s), {} event(s).",
                result.tasks.len(),
                result.events.len()
            );
            respond("parse_capture", &result, message)
        }
        Err(err) => CaptureResponse::failure(format!("parse_capture failed: {err}")),
    }
}

/// Parses a capture block-by-block (`---` dividers).
///
/// # FFI contract
/// - Same input semantics and error handling as `parse_capture`.
#[flutter_rust_bridge::frb(sync)]
pub fn parse_capture_blocks(
    raw_text: String,
    now_ms: i64,
    config_json: String,
) -> CaptureResponse {
    let parsed = CaptureService::from_json(&config_json)
        .and_then(|service| service.parse_blocks(&raw_text, now_ms));
    match parsed {
        Ok(result) => {
            let message = format!("Parsed {} block(s).", result.blocks.len());
            respond("parse_capture_blocks", &result, message)
        }
        Err(err) => CaptureResponse::failure(format!("parse_capture_blocks failed: {err}")),
    }
}

fn respond<T: Serialize>(operation: &str, result: &T, message: String) -> CaptureResponse {
    match serde_json::to_string(result) {
        Ok(payload) => CaptureResponse::success(payload, message),
        Err(err) => {
            warn!("event=ffi_serialize module=ffi status=error op={operation}");
            CaptureResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}
