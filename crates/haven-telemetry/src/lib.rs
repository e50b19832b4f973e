//! # Haven Telemetry
//!
//! Structured logging for the Haven suite. Nothing here persists or alerts;
//! failures are logged and dropped by design, so this crate only wires up
//! `tracing` with an env filter and optional JSON output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;

pub use logging::init_logging;

/// Configuration for logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name included in the startup log line.
    pub service_name: String,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON-formatted logs.
    pub json_logs: bool,
}

impl TelemetryConfig {
    /// Creates a configuration with `info` level and human-readable output.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Sets the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enables JSON logging.
    #[must_use]
    pub fn with_json_logs(mut self) -> Self {
        self.json_logs = true;
        self
    }
}
