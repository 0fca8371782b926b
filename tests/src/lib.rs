//! # SIWE Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Signed-message builders shared by tests and benches
//! └── integration/      # Cross-crate flows
//!     ├── flows.rs      # Sign-in lifecycle, bindings, time windows
//!     └── properties.rs # Property tests over the public API
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p siwe-tests
//!
//! # By category
//! cargo test -p siwe-tests integration::flows
//! cargo test -p siwe-tests integration::properties
//!
//! # Benchmarks
//! cargo bench -p siwe-tests
//! ```

pub mod fixtures;
pub mod integration;
