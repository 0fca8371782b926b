//! # Sign-In with Ethereum (EIP-4361)
//!
//! Message model, parser, canonical serializer and verifier for SIWE.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): message model, grammar, field and binding rules
//! - **Ports Layer** (`ports/`): `SiweApi` inbound; hashing, nonce, URI and
//!   signature-recovery collaborators outbound
//! - **Adapters Layer** (`adapters/`): `shared-crypto` and `url` backed
//!   collaborators, JSON facade
//! - **Service Layer** (`service.rs`): wires domain rules to ports
//!
//! ## Verification Order
//!
//! 1. Field re-validation
//! 2. Domain binding, nonce binding, expiration (exclusive), not-before (inclusive)
//! 3. Canonical rendering, then signer recovery
//! 4. Recovered address must equal the message address
//!
//! The first failure is reported. Binding failures skip recovery entirely.
//!
//! ## Security Notes
//!
//! - **Replay**: bind the nonce you issued with `VerifyParams::with_nonce`
//! - **Phishing**: bind the expected origin with `VerifyParams::with_domain`
//! - **Malleability (EIP-2)**: high-S signatures are rejected during recovery

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{
    JsonSiweFacade, Keccak256Hasher, OsNonceGenerator, PersonalSignRecovery, RfcUriChecker,
};
pub use config::{ConfigError, SiweConfig};
pub use domain::context::MessageContext;
pub use domain::errors::{SiweError, SiweErrorKind};
pub use domain::message::{generate_nonce, ChainId, MessageFields, MessageInput, SiweMessage};
pub use domain::parser::{parse_message, ParseError, ParsedMessage};
pub use domain::validators::{
    is_eip55_address, is_valid_domain, is_valid_iso8601_date, is_valid_nonce,
    to_checksum_address, SIWE_VERSION,
};
pub use domain::verification::{SiweResponse, VerificationFailure, VerifyOpts, VerifyParams};
pub use ports::inbound::SiweApi;
pub use ports::outbound::{ChecksumHasher, NonceGenerator, SignatureRecovery, UriSyntaxChecker};
pub use service::SiweService;
