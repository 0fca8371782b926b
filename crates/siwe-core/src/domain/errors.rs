//! # SIWE Errors
//!
//! One error type for the whole subsystem. Every variant maps to exactly one
//! [`SiweErrorKind`], the stable, wire-visible classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::parser::ParseError;

/// Stable classification of a [`SiweError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiweErrorKind {
    /// `expirationTime` is at or before the check instant
    ExpiredMessage,
    /// Domain is empty or not an authority
    InvalidDomain,
    /// Expected domain differs from the message domain
    DomainMismatch,
    /// Expected nonce differs from the message nonce
    NonceMismatch,
    /// Address is not EIP-55, or the recovered signer differs
    InvalidAddress,
    /// URI is not syntactically valid
    InvalidUri,
    /// Nonce is not alphanumeric of length >= 8
    InvalidNonce,
    /// `notBefore` is after the check instant
    NotYetValidMessage,
    /// No usable signature was supplied
    InvalidSignature,
    /// A timestamp is not ISO-8601 or not a calendar date
    InvalidTimeFormat,
    /// Version is not "1"
    InvalidMessageVersion,
    /// Raw input is malformed, or an API was misused
    UnableToParse,
    /// Unrecognized keys in verification params or options
    InvalidParams,
    /// The random source could not produce a nonce
    NonceGeneration,
}

impl SiweErrorKind {
    /// The SCREAMING_SNAKE_CASE name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpiredMessage => "EXPIRED_MESSAGE",
            Self::InvalidDomain => "INVALID_DOMAIN",
            Self::DomainMismatch => "DOMAIN_MISMATCH",
            Self::NonceMismatch => "NONCE_MISMATCH",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidUri => "INVALID_URI",
            Self::InvalidNonce => "INVALID_NONCE",
            Self::NotYetValidMessage => "NOT_YET_VALID_MESSAGE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidTimeFormat => "INVALID_TIME_FORMAT",
            Self::InvalidMessageVersion => "INVALID_MESSAGE_VERSION",
            Self::UnableToParse => "UNABLE_TO_PARSE",
            Self::InvalidParams => "INVALID_PARAMS",
            Self::NonceGeneration => "NONCE_GENERATION",
        }
    }
}

impl fmt::Display for SiweErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building, validating or verifying a SIWE message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SiweError {
    // =========================================================================
    // Field validation
    // =========================================================================
    /// Domain (or scheme) is not a valid origin authority
    #[error("Invalid domain: expected {received:?} to be a valid domain")]
    InvalidDomain { received: String },

    /// Address is not in EIP-55 form; `expected` is the checksummed form when computable
    #[error("Invalid address: expected {expected}, got {received}")]
    InvalidAddress { expected: String, received: String },

    /// URI failed the syntax check
    #[error("Invalid URI: expected {received:?} to be a valid uri")]
    InvalidUri { received: String },

    /// Version is not the single supported value
    #[error("Invalid message version: expected {expected}, got {received}")]
    InvalidMessageVersion { expected: String, received: String },

    /// Nonce is shorter than 8 characters or not alphanumeric
    #[error("Invalid nonce: expected alphanumeric of length >= 8, got {received:?}")]
    InvalidNonce { received: String },

    /// A timestamp field is not a valid ISO-8601 date-time
    #[error("Invalid time format for {field}: {received:?}")]
    InvalidTimeFormat { field: &'static str, received: String },

    // =========================================================================
    // Parsing and API misuse
    // =========================================================================
    /// Raw text does not follow the EIP-4361 grammar
    #[error("Unable to parse message: {0}")]
    UnableToParse(#[from] ParseError),

    /// Structured input is malformed (bad chain id, embedded line break, wrong JSON shape)
    #[error("Unable to parse: {0}")]
    MalformedInput(String),

    /// `validate_message` was handed arguments
    #[error("Unexpected argument in the validateMessage function ({count} given)")]
    UnexpectedArguments { count: usize },

    /// Verification params or options carry keys outside the allow-list
    #[error("{} is/are not valid key(s) for {target}", .keys.join(", "))]
    InvalidParams {
        target: &'static str,
        keys: Vec<String>,
    },

    /// The nonce source failed
    #[error("Error during nonce creation: {0}")]
    NonceGeneration(String),

    // =========================================================================
    // Verification
    // =========================================================================
    /// Caller-expected domain differs from the message
    #[error("Domain mismatch: expected {expected}, got {received}")]
    DomainMismatch { expected: String, received: String },

    /// Caller-expected nonce differs from the message
    #[error("Nonce mismatch: expected {expected}, got {received}")]
    NonceMismatch { expected: String, received: String },

    /// Check instant is at or after `expirationTime`
    #[error("Expired message: expected {expected}, got {received}")]
    ExpiredMessage { expected: String, received: String },

    /// Check instant is before `notBefore`
    #[error("Message not yet valid: expected {expected}, got {received}")]
    NotYetValidMessage { expected: String, received: String },

    /// No signature to recover from
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },
}

impl SiweError {
    /// Stable classification of this error.
    pub fn kind(&self) -> SiweErrorKind {
        match self {
            Self::InvalidDomain { .. } => SiweErrorKind::InvalidDomain,
            Self::InvalidAddress { .. } => SiweErrorKind::InvalidAddress,
            Self::InvalidUri { .. } => SiweErrorKind::InvalidUri,
            Self::InvalidMessageVersion { .. } => SiweErrorKind::InvalidMessageVersion,
            Self::InvalidNonce { .. } => SiweErrorKind::InvalidNonce,
            Self::InvalidTimeFormat { .. } => SiweErrorKind::InvalidTimeFormat,
            Self::UnableToParse(_)
            | Self::MalformedInput(_)
            | Self::UnexpectedArguments { .. } => SiweErrorKind::UnableToParse,
            Self::InvalidParams { .. } => SiweErrorKind::InvalidParams,
            Self::NonceGeneration(_) => SiweErrorKind::NonceGeneration,
            Self::DomainMismatch { .. } => SiweErrorKind::DomainMismatch,
            Self::NonceMismatch { .. } => SiweErrorKind::NonceMismatch,
            Self::ExpiredMessage { .. } => SiweErrorKind::ExpiredMessage,
            Self::NotYetValidMessage { .. } => SiweErrorKind::NotYetValidMessage,
            Self::InvalidSignature { .. } => SiweErrorKind::InvalidSignature,
        }
    }
}
