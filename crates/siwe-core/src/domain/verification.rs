//! # Verification Rules
//!
//! Inputs, outputs and the binding checks that run before signature recovery.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use super::errors::SiweError;
use super::message::SiweMessage;

/// What the caller expects of the signed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyParams {
    /// Hex signature over the canonical string
    pub signature: String,
    /// Expected domain; unchecked when `None`
    pub domain: Option<String>,
    /// Expected nonce; unchecked when `None`
    pub nonce: Option<String>,
    /// Check instant; the current time when `None`
    pub time: Option<DateTime<Utc>>,
}

impl VerifyParams {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// Verification options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOpts {
    /// Return failures as `Ok(SiweResponse { success: false, .. })`
    pub suppress_exceptions: bool,
}

impl VerifyOpts {
    pub fn suppressed() -> Self {
        Self {
            suppress_exceptions: true,
        }
    }
}

/// Outcome of a verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiweResponse {
    pub success: bool,
    /// The message as verified, with lazy defaults filled
    pub data: SiweMessage,
    pub error: Option<SiweError>,
}

/// Raised verification failure. Carries the same content as a suppressed one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{error}")]
pub struct VerificationFailure {
    pub data: SiweMessage,
    #[source]
    pub error: SiweError,
}

impl VerificationFailure {
    pub fn into_response(self) -> SiweResponse {
        SiweResponse {
            success: false,
            data: self.data,
            error: Some(self.error),
        }
    }
}

/// ISO-8601 rendering used in diagnostics.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a validated message timestamp.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, SiweError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| SiweError::InvalidTimeFormat {
            field,
            received: value.to_string(),
        })
}

/// Every failing binding check, in report order: domain, nonce, expiration,
/// not-before.
///
/// The expiration bound is exclusive; `not_before` is inclusive.
pub fn binding_failures(
    message: &SiweMessage,
    params: &VerifyParams,
    now: &DateTime<Utc>,
) -> Result<Vec<SiweError>, SiweError> {
    let mut failures = Vec::new();

    if let Some(domain) = params.domain.as_deref().filter(|d| *d != message.domain) {
        failures.push(SiweError::DomainMismatch {
            expected: domain.to_string(),
            received: message.domain.clone(),
        });
    }

    if let Some(nonce) = params
        .nonce
        .as_deref()
        .filter(|n| Some(*n) != message.nonce.as_deref())
    {
        failures.push(SiweError::NonceMismatch {
            expected: nonce.to_string(),
            received: message.nonce.clone().unwrap_or_default(),
        });
    }

    let now_text = format_instant(now);

    if let Some(expiration) = &message.expiration_time {
        if *now >= parse_instant("expirationTime", expiration)? {
            failures.push(SiweError::ExpiredMessage {
                expected: format!("{now_text} < {expiration}"),
                received: format!("{now_text} >= {expiration}"),
            });
        }
    }

    if let Some(not_before) = &message.not_before {
        if *now < parse_instant("notBefore", not_before)? {
            failures.push(SiweError::NotYetValidMessage {
                expected: format!("{now_text} >= {not_before}"),
                received: format!("{now_text} < {not_before}"),
            });
        }
    }

    Ok(failures)
}
