//! # Shared Crypto - Ethereum Account Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256 | EIP-55 checksums, EIP-191 digests, address derivation |
//! | `ecdsa` | secp256k1 | EIP-191 personal-message signing and signer recovery |
//! | `random` | OS CSPRNG | Alphanumeric tokens with a requested entropy floor |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic signing, low-S enforcement (EIP-2)
//! - **Recovery**: R/S range checks in constant time before touching the curve
//! - **Random tokens**: rejection sampling, no modulo bias

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod random;

// Re-exports
pub use ecdsa::{personal_message_hash, recover_personal_sign, Address, EthereumKeyPair};
pub use errors::CryptoError;
pub use hashing::{keccak256, keccak256_hex, to_checksum_hex, Hash};
pub use random::{random_string_for_entropy, ALPHANUMERIC};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
