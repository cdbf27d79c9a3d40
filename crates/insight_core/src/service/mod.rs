//! Core use-case services.
//!
//! # Responsibility
//! - Wrap the capture pipeline behind a configured, validated entry point.
//! - Keep FFI/CLI layers decoupled from interpreter internals.

pub mod capture_service;
