//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is not set
pub fn default_directive(level: &str) -> String {
    format!(
        "searchlight={},tower_http=debug",
        level.trim().to_lowercase()
    )
}

/// Initialize tracing subscriber for structured logging
///
/// This can only be called once per process. Subsequent calls are silently ignored.
///
/// `RUST_LOG` takes precedence over `default_level`.
///
/// # Examples
///
/// ```no_run
/// searchlight::telemetry::init("info");
/// tracing::info!("Application started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_normalizes_level() {
        assert_eq!(
            default_directive(" WARN "),
            "searchlight=warn,tower_http=debug"
        );
        assert!(EnvFilter::try_new(default_directive("debug")).is_ok());
    }

    #[test]
    fn test_init_is_idempotent() {
        init("info");
        init("debug");
    }
}
