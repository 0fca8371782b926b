//! # Integration Tests
//!
//! End-to-end flows across `shared-crypto`, `siwe-core` and `siwe-telemetry`.

pub mod flows;
pub mod properties;
