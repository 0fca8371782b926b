//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators this subsystem delegates to: hashing, randomness, URI syntax
//! and signature recovery. Implementations must be safe to call concurrently.

use crate::domain::errors::SiweError;
use shared_crypto::CryptoError;

/// Keccak-256 provider used for EIP-55 checksum casing.
pub trait ChecksumHasher: Send + Sync {
    /// Digest of `data`.
    fn keccak256(&self, data: &[u8]) -> [u8; 32];
}

/// Cryptographically secure source of alphanumeric tokens.
pub trait NonceGenerator: Send + Sync {
    /// Alphanumeric token carrying at least `entropy_bits` of entropy.
    ///
    /// # Errors
    /// * `SiweError::NonceGeneration` - the random source failed
    fn generate(&self, entropy_bits: u32) -> Result<String, SiweError>;
}

/// General URI syntax check (RFC 3986).
pub trait UriSyntaxChecker: Send + Sync {
    /// Whether `uri` is a syntactically valid absolute URI.
    fn is_valid_uri(&self, uri: &str) -> bool;
}

/// Recovers the signer of a wallet-signed message.
///
/// Recovery failures are reported, never retried: a failed recovery means a
/// wrong signature, not a transient fault.
#[async_trait::async_trait]
pub trait SignatureRecovery: Send + Sync {
    /// Recover the EIP-55 address that signed `message`.
    ///
    /// # Errors
    /// * `CryptoError::InvalidSignatureFormat` - signature is not 65 bytes of hex
    /// * `CryptoError::MalleableSignature` - high S value
    /// * `CryptoError::RecoveryFailed` - no public key fits the signature
    async fn recover_message_address(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<String, CryptoError>;
}
