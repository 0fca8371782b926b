//! Collaborators and defaults that message construction and validation need.

use std::fmt;
use std::sync::Arc;

use crate::config::SiweConfig;
use crate::ports::outbound::{ChecksumHasher, NonceGenerator, UriSyntaxChecker};

/// Shared, immutable context for building and validating messages.
///
/// Cheap to clone; all providers are reference-counted.
#[derive(Clone)]
pub struct MessageContext {
    pub hasher: Arc<dyn ChecksumHasher>,
    pub nonces: Arc<dyn NonceGenerator>,
    pub uris: Arc<dyn UriSyntaxChecker>,
    /// Entropy requested from `nonces` when a nonce is generated
    pub nonce_entropy_bits: u32,
    /// Chain id used when input omits one
    pub default_chain_id: u64,
}

impl MessageContext {
    /// Context with explicit providers and the default configuration.
    pub fn new(
        hasher: Arc<dyn ChecksumHasher>,
        nonces: Arc<dyn NonceGenerator>,
        uris: Arc<dyn UriSyntaxChecker>,
    ) -> Self {
        Self::with_config(hasher, nonces, uris, &SiweConfig::default())
    }

    /// Context with explicit providers and configuration.
    pub fn with_config(
        hasher: Arc<dyn ChecksumHasher>,
        nonces: Arc<dyn NonceGenerator>,
        uris: Arc<dyn UriSyntaxChecker>,
        config: &SiweConfig,
    ) -> Self {
        Self {
            hasher,
            nonces,
            uris,
            nonce_entropy_bits: config.nonce_entropy_bits,
            default_chain_id: config.default_chain_id,
        }
    }
}

impl fmt::Debug for MessageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageContext")
            .field("nonce_entropy_bits", &self.nonce_entropy_bits)
            .field("default_chain_id", &self.default_chain_id)
            .finish_non_exhaustive()
    }
}
