//! Subscriber installation.
//!
//! Only binaries and test harnesses call into this module; library crates log
//! through `tracing` macros and never install a subscriber.

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

static TEST_LOGGING: Once = Once::new();

/// Install the global subscriber: `EnvFilter` plus a text or JSON `fmt` layer.
///
/// # Errors
/// * `TelemetryError::InvalidFilter` - `log_level` is not a valid directive
/// * `TelemetryError::SubscriberInit` - a global subscriber is already set
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidFilter(e.to_string()))?;

    if config.json_logs {
        // JSON output for containers/production
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "logging initialized"
    );

    Ok(())
}

/// Test-writer subscriber, installed at most once per process.
///
/// Honors `RUST_LOG`, defaulting to `debug` for the SIWE crates. Safe to call
/// from every test; later calls and pre-existing subscribers are ignored.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("siwe_core=debug,shared_crypto=debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}
