//! SIWE subsystem configuration with validation.

use serde::{Deserialize, Serialize};
use std::env;

/// Default nonce entropy: 17 alphanumeric characters.
pub const DEFAULT_NONCE_ENTROPY_BITS: u32 = 96;

/// Chain used when a message omits its chain id (Ethereum mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Smallest entropy that still yields the 8-character nonce floor.
pub const MIN_NONCE_ENTROPY_BITS: u32 = 48;

/// Upper bound on requested nonce entropy.
pub const MAX_NONCE_ENTROPY_BITS: u32 = 512;

/// Subsystem configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiweConfig {
    /// Entropy of generated nonces, in bits
    pub nonce_entropy_bits: u32,
    /// Chain id applied when input omits one
    pub default_chain_id: u64,
}

impl Default for SiweConfig {
    fn default() -> Self {
        Self {
            nonce_entropy_bits: DEFAULT_NONCE_ENTROPY_BITS,
            default_chain_id: DEFAULT_CHAIN_ID,
        }
    }
}

impl SiweConfig {
    /// Configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SIWE_NONCE_ENTROPY_BITS`: nonce entropy (default: 96)
    /// - `SIWE_DEFAULT_CHAIN_ID`: chain id for messages without one (default: 1)
    ///
    /// Unparsable values fall back to the default; range checks are left to
    /// [`SiweConfig::validate`].
    pub fn from_env() -> Self {
        Self {
            nonce_entropy_bits: env::var("SIWE_NONCE_ENTROPY_BITS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_NONCE_ENTROPY_BITS),

            default_chain_id: env::var("SIWE_DEFAULT_CHAIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CHAIN_ID),
        }
    }

    pub fn with_nonce_entropy_bits(mut self, bits: u32) -> Self {
        self.nonce_entropy_bits = bits;
        self
    }

    pub fn with_default_chain_id(mut self, chain_id: u64) -> Self {
        self.default_chain_id = chain_id;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_NONCE_ENTROPY_BITS..=MAX_NONCE_ENTROPY_BITS).contains(&self.nonce_entropy_bits) {
            return Err(ConfigError::InvalidNonceEntropy {
                bits: self.nonce_entropy_bits,
            });
        }

        if self.default_chain_id == 0 {
            return Err(ConfigError::InvalidChainId);
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Entropy outside the supported range
    #[error(
        "invalid nonce entropy: {bits} bits (must be {MIN_NONCE_ENTROPY_BITS}..={MAX_NONCE_ENTROPY_BITS})"
    )]
    InvalidNonceEntropy { bits: u32 },
    /// Default chain id of zero
    #[error("invalid default chain id: must be non-zero")]
    InvalidChainId,
}
