//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature is not valid hex or not 65 bytes long
    #[error("Invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// Recovery ID (v) outside 0, 1, 27, 28
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// R or S outside [1, n-1]
    #[error("Signature scalar out of range")]
    ScalarOutOfRange,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Public key could not be recovered from the signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Requested entropy is outside the supported range
    #[error("Invalid entropy request: {bits} bits")]
    InvalidEntropy {
        /// Requested bits of entropy
        bits: u32,
    },

    /// The operating system random source failed
    #[error("Random source failure: {0}")]
    RandomSource(String),
}
