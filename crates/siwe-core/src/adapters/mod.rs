//! # Adapters Module
//!
//! Implementations of the outbound ports, and the JSON front end over the
//! inbound port.

pub mod crypto;
pub mod json;
pub mod uri;

use std::sync::Arc;

use crate::config::SiweConfig;
use crate::domain::context::MessageContext;

pub use crypto::{Keccak256Hasher, OsNonceGenerator, PersonalSignRecovery};
pub use json::JsonSiweFacade;
pub use uri::RfcUriChecker;

impl MessageContext {
    /// Context over the production adapters with the given configuration.
    pub fn from_config(config: &SiweConfig) -> Self {
        Self::with_config(
            Arc::new(Keccak256Hasher),
            Arc::new(OsNonceGenerator),
            Arc::new(RfcUriChecker),
            config,
        )
    }
}

impl Default for MessageContext {
    fn default() -> Self {
        Self::from_config(&SiweConfig::default())
    }
}
