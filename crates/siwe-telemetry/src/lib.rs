//! # SIWE Telemetry
//!
//! Logging bootstrap for SIWE services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use siwe_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Verification logs from siwe-core are now emitted
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIWE_SERVICE_NAME` | `siwe` | Service name in startup logs |
//! | `SIWE_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `SIWE_JSON_LOGS` | `false` | JSON output (defaults on inside containers) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
