//! # Crypto Adapters
//!
//! Outbound ports backed by `shared-crypto`: Keccak-256 (`sha3`), OS CSPRNG
//! (`rand`) and EIP-191 signer recovery (`k256`).

use async_trait::async_trait;
use shared_crypto::{keccak256, random_string_for_entropy, recover_personal_sign, to_checksum_hex};
use shared_crypto::CryptoError;

use crate::domain::errors::SiweError;
use crate::ports::outbound::{ChecksumHasher, NonceGenerator, SignatureRecovery};

/// Keccak-256 over `sha3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Hasher;

impl ChecksumHasher for Keccak256Hasher {
    fn keccak256(&self, data: &[u8]) -> [u8; 32] {
        keccak256(data)
    }
}

/// Alphanumeric nonces from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceGenerator;

impl NonceGenerator for OsNonceGenerator {
    fn generate(&self, entropy_bits: u32) -> Result<String, SiweError> {
        random_string_for_entropy(entropy_bits).map_err(|e| SiweError::NonceGeneration(e.to_string()))
    }
}

/// EIP-191 `personal_sign` recovery for externally owned accounts.
///
/// Contract wallets (EIP-1271) need an RPC provider and are not handled here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalSignRecovery;

#[async_trait]
impl SignatureRecovery for PersonalSignRecovery {
    async fn recover_message_address(
        &self,
        message: &str,
        signature: &str,
    ) -> Result<String, CryptoError> {
        let address = recover_personal_sign(message.as_bytes(), signature)?;
        Ok(to_checksum_hex(&address))
    }
}
