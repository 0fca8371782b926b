//! # SIWE Service
//!
//! Application service layer that implements the `SiweApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`SiweApi`)
//! - Uses the outbound `SignatureRecovery` port for signer recovery
//! - Delegates message rules to the domain layer through a shared
//!   [`MessageContext`]
//!
//! The service holds only immutable state, so one instance can serve
//! concurrent verifications.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::adapters::crypto::PersonalSignRecovery;
use crate::config::{ConfigError, SiweConfig};
use crate::domain::context::MessageContext;
use crate::domain::errors::SiweError;
use crate::domain::message::{self, MessageInput, SiweMessage};
use crate::domain::verification::{
    binding_failures, SiweResponse, VerificationFailure, VerifyOpts, VerifyParams,
};
use crate::ports::inbound::SiweApi;
use crate::ports::outbound::SignatureRecovery;

/// SIWE service over a signature recovery adapter.
pub struct SiweService<R: SignatureRecovery = PersonalSignRecovery> {
    context: MessageContext,
    recovery: R,
    config: SiweConfig,
}

impl<R: SignatureRecovery> SiweService<R> {
    /// Service over the production adapters.
    ///
    /// # Errors
    /// `ConfigError` if `config` fails validation.
    pub fn new(config: SiweConfig, recovery: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            context: MessageContext::from_config(&config),
            recovery,
            config,
        })
    }

    /// Service over explicit collaborators.
    pub fn with_context(context: MessageContext, recovery: R) -> Self {
        let config = SiweConfig {
            nonce_entropy_bits: context.nonce_entropy_bits,
            default_chain_id: context.default_chain_id,
        };
        Self {
            context,
            recovery,
            config,
        }
    }

    pub fn context(&self) -> &MessageContext {
        &self.context
    }

    pub fn config(&self) -> &SiweConfig {
        &self.config
    }

    /// Ordered checks; the first failure is returned.
    async fn run_checks(
        &self,
        message: &mut SiweMessage,
        params: &VerifyParams,
    ) -> Result<(), SiweError> {
        message.validate_message(&self.context)?;

        let now = params.time.unwrap_or_else(Utc::now);
        let failures = binding_failures(message, params, &now)?;
        for failure in &failures {
            debug!(kind = %failure.kind(), error = %failure, "binding check failed");
        }
        if let Some(first) = failures.into_iter().next() {
            return Err(first);
        }

        let canonical = message.prepare_message(&self.context)?;

        let recovered = match self
            .recovery
            .recover_message_address(&canonical, &params.signature)
            .await
        {
            Ok(address) => Some(address),
            Err(e) => {
                warn!(error = %e, address = %message.address, "signature recovery failed");
                None
            }
        };

        if recovered.as_deref() != Some(message.address.as_str()) {
            return Err(SiweError::InvalidAddress {
                expected: recovered.unwrap_or_default(),
                received: message.address.clone(),
            });
        }

        Ok(())
    }
}

impl Default for SiweService<PersonalSignRecovery> {
    fn default() -> Self {
        Self::with_context(MessageContext::default(), PersonalSignRecovery)
    }
}

#[async_trait]
impl<R: SignatureRecovery> SiweApi for SiweService<R> {
    fn create_message(&self, input: MessageInput) -> Result<SiweMessage, SiweError> {
        let message = SiweMessage::new(input, &self.context);
        if let Err(e) = &message {
            debug!(kind = %e.kind(), error = %e, "message rejected");
        }
        message
    }

    fn generate_nonce(&self) -> Result<String, SiweError> {
        message::generate_nonce(&self.context)
    }

    fn prepare_message(&self, message: &mut SiweMessage) -> Result<String, SiweError> {
        message.prepare_message(&self.context)
    }

    fn validate_message(&self, message: &SiweMessage) -> Result<(), SiweError> {
        message.validate_message(&self.context)
    }

    async fn verify(
        &self,
        mut message: SiweMessage,
        params: VerifyParams,
        opts: VerifyOpts,
    ) -> Result<SiweResponse, VerificationFailure> {
        match self.run_checks(&mut message, &params).await {
            Ok(()) => {
                info!(
                    domain = %message.domain,
                    address = %message.address,
                    chain_id = message.chain_id,
                    "SIWE message verified"
                );
                Ok(SiweResponse {
                    success: true,
                    data: message,
                    error: None,
                })
            }
            Err(error) => {
                debug!(kind = %error.kind(), "SIWE verification failed");
                let failure = VerificationFailure {
                    data: message,
                    error,
                };
                if opts.suppress_exceptions {
                    Ok(failure.into_response())
                } else {
                    Err(failure)
                }
            }
        }
    }
}
