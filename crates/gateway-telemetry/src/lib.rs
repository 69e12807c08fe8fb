//! # Gateway Telemetry
//!
//! Observability for the chat gateway.
//!
//! This crate provides:
//! - Structured logging setup (pretty or JSON)
//! - Secret redaction and truncation for log lines and error bodies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;
pub mod redact;

// Re-export main types
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use redact::{redact_credential, redact_secrets, sanitize_for_log, truncate_for_log};
