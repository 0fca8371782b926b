//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the SIWE subsystem.

use async_trait::async_trait;

use crate::domain::errors::SiweError;
use crate::domain::message::{MessageInput, SiweMessage};
use crate::domain::verification::{SiweResponse, VerificationFailure, VerifyOpts, VerifyParams};

/// Primary SIWE API.
///
/// Implementations must be thread-safe (`Send + Sync`); verifications of
/// distinct messages may run concurrently.
#[async_trait]
pub trait SiweApi: Send + Sync {
    // =========================================================================
    // Message lifecycle
    // =========================================================================

    /// Build a validated message from raw text or structured fields.
    fn create_message(&self, input: MessageInput) -> Result<SiweMessage, SiweError>;

    /// Fresh alphanumeric nonce.
    fn generate_nonce(&self) -> Result<String, SiweError>;

    /// Canonical string for a wallet to sign. Fills `nonce`/`issued_at` if absent.
    fn prepare_message(&self, message: &mut SiweMessage) -> Result<String, SiweError>;

    /// Re-run every field rule.
    fn validate_message(&self, message: &SiweMessage) -> Result<(), SiweError>;

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verify `params.signature` over `message`.
    ///
    /// Checks run in order: message validity, domain, nonce, expiration,
    /// not-before, then signature recovery and address match. The first
    /// failure is reported.
    ///
    /// # Errors
    /// `VerificationFailure` unless `opts.suppress_exceptions` is set, in
    /// which case the failure comes back as `Ok` with `success == false`.
    async fn verify(
        &self,
        message: SiweMessage,
        params: VerifyParams,
        opts: VerifyOpts,
    ) -> Result<SiweResponse, VerificationFailure>;

    /// Verify with default options and unwrap the result.
    #[deprecated(note = "use `verify` instead")]
    async fn validate(&self, message: SiweMessage, signature: &str) -> Result<SiweMessage, SiweError> {
        tracing::warn!(
            "validate() is deprecated and will be removed in future versions, use verify() instead"
        );
        self.verify(message, VerifyParams::new(signature), VerifyOpts::default())
            .await
            .map(|response| response.data)
            .map_err(|failure| failure.error)
    }
}
