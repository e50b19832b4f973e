//! Subscriber installation for the suite's binaries.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::TelemetryConfig;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured level when set. Human-readable
/// output uses the compact formatter; `json_logs` switches to one JSON
/// object per line with event fields flattened, the shape serverless log
/// collectors ingest directly.
///
/// Safe to call more than once; later calls leave the first subscriber
/// in place.
pub fn init_logging(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().flatten_event(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(true))
            .try_init()
    };

    if installed.is_ok() {
        tracing::info!(
            service = %config.service_name,
            level = %config.log_level,
            json = config.json_logs,
            "Logging initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_keeps_first_subscriber() {
        let config = TelemetryConfig::new("haven-tests").with_log_level("debug");
        init_logging(&config);
        init_logging(&config.with_json_logs());
    }
}
