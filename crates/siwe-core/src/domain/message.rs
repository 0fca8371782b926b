//! # SIWE Message Model
//!
//! [`SiweMessage`] is the validated value object. It is built from raw text or
//! from structured fields; both paths end in [`SiweMessage::validate_message`].
//!
//! Canonical rendering (`to_message`) fills the two lazily defaulted fields,
//! `nonce` and `issued_at`, on first use and is idempotent afterwards.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::context::MessageContext;
use super::errors::SiweError;
use super::parser::{parse_message, ParsedMessage, HEADER_SUFFIX};
use super::validators::{
    is_eip55_address, is_hex_address, is_single_line, is_valid_domain, is_valid_iso8601_date,
    is_valid_nonce, is_valid_scheme, is_valid_version, to_checksum_address, SIWE_VERSION,
};

/// Chain id as supplied by a caller: a number, or its decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Number(u64),
    Text(String),
}

impl ChainId {
    /// Numeric value. Text must be base-10 digits only.
    pub fn resolve(&self) -> Result<u64, SiweError> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(text) => {
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(SiweError::MalformedInput(format!(
                        "chain id {text:?} is not an integer"
                    )));
                }
                text.parse().map_err(|_| {
                    SiweError::MalformedInput(format!("chain id {text:?} is out of range"))
                })
            }
        }
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ChainId {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Structured constructor input. Missing fields are empty or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageFields {
    pub scheme: Option<String>,
    pub domain: String,
    pub address: String,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: Option<ChainId>,
    pub nonce: Option<String>,
    pub issued_at: Option<String>,
    pub expiration_time: Option<String>,
    pub not_before: Option<String>,
    pub request_id: Option<String>,
    pub resources: Option<Vec<String>>,
}

/// Either form a message can be constructed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInput {
    FromText(String),
    FromFields(MessageFields),
}

impl From<&str> for MessageInput {
    fn from(raw: &str) -> Self {
        Self::FromText(raw.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(raw: String) -> Self {
        Self::FromText(raw)
    }
}

impl From<MessageFields> for MessageInput {
    fn from(fields: MessageFields) -> Self {
        Self::FromFields(fields)
    }
}

/// A validated EIP-4361 message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiweMessage {
    /// URI scheme of the requesting origin, when the header carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// RFC 3986 authority requesting the signing
    pub domain: String,
    /// EIP-55 checksummed signer address
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    /// Subject of the signing
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    /// Present after construction; absent only on deserialized values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl SiweMessage {
    /// Build and validate a message.
    ///
    /// A missing nonce is generated; a missing chain id takes the context
    /// default.
    ///
    /// # Errors
    /// * `SiweError::UnableToParse` - raw text does not follow the grammar
    /// * `SiweError::MalformedInput` - non-numeric chain id
    /// * `SiweError::NonceGeneration` - nonce source failed
    /// * any field-validation error from [`SiweMessage::validate_message`]
    pub fn new(input: impl Into<MessageInput>, ctx: &MessageContext) -> Result<Self, SiweError> {
        let mut message = match input.into() {
            MessageInput::FromText(raw) => Self::from_parsed(parse_message(&raw)?),
            MessageInput::FromFields(fields) => Self::from_field_set(fields, ctx)?,
        };

        if message.nonce.is_none() {
            message.nonce = Some(generate_nonce(ctx)?);
        }

        message.validate_message(ctx)?;
        Ok(message)
    }

    pub fn from_text(raw: &str, ctx: &MessageContext) -> Result<Self, SiweError> {
        Self::new(MessageInput::from(raw), ctx)
    }

    pub fn from_fields(fields: MessageFields, ctx: &MessageContext) -> Result<Self, SiweError> {
        Self::new(MessageInput::FromFields(fields), ctx)
    }

    fn from_parsed(parsed: ParsedMessage) -> Self {
        Self {
            scheme: parsed.scheme,
            domain: parsed.domain,
            address: parsed.address,
            statement: parsed.statement,
            uri: parsed.uri,
            version: parsed.version,
            chain_id: parsed.chain_id,
            nonce: Some(parsed.nonce),
            issued_at: parsed.issued_at,
            expiration_time: parsed.expiration_time,
            not_before: parsed.not_before,
            request_id: parsed.request_id,
            resources: parsed.resources,
        }
    }

    fn from_field_set(fields: MessageFields, ctx: &MessageContext) -> Result<Self, SiweError> {
        let chain_id = match &fields.chain_id {
            Some(id) => id.resolve()?,
            None => ctx.default_chain_id,
        };

        Ok(Self {
            scheme: fields.scheme,
            domain: fields.domain,
            address: fields.address,
            // An empty statement would render as a blank statement line
            statement: fields.statement.filter(|s| !s.is_empty()),
            uri: fields.uri,
            version: fields.version,
            chain_id,
            nonce: fields.nonce,
            issued_at: fields.issued_at,
            expiration_time: fields.expiration_time,
            not_before: fields.not_before,
            request_id: fields.request_id,
            resources: fields.resources,
        })
    }

    /// Check every field rule, stopping at the first failure.
    ///
    /// Order: domain, address, uri, version, nonce, issuedAt, expirationTime,
    /// notBefore, then the free-text fields.
    pub fn validate_message(&self, ctx: &MessageContext) -> Result<(), SiweError> {
        if !is_valid_domain(&self.domain) {
            return Err(SiweError::InvalidDomain {
                received: self.domain.clone(),
            });
        }
        if let Some(scheme) = self.scheme.as_deref().filter(|s| !is_valid_scheme(s)) {
            return Err(SiweError::InvalidDomain {
                received: format!("{scheme}://{}", self.domain),
            });
        }

        if !is_eip55_address(&self.address, ctx.hasher.as_ref()) {
            let expected = if is_hex_address(&self.address) {
                to_checksum_address(&self.address, ctx.hasher.as_ref())
            } else {
                "an EIP-55 checksummed address".to_string()
            };
            return Err(SiweError::InvalidAddress {
                expected,
                received: self.address.clone(),
            });
        }

        if !ctx.uris.is_valid_uri(&self.uri) {
            return Err(SiweError::InvalidUri {
                received: self.uri.clone(),
            });
        }

        if !is_valid_version(&self.version) {
            return Err(SiweError::InvalidMessageVersion {
                expected: SIWE_VERSION.to_string(),
                received: self.version.clone(),
            });
        }

        if let Some(nonce) = self.nonce.as_deref().filter(|n| !is_valid_nonce(n)) {
            return Err(SiweError::InvalidNonce {
                received: nonce.to_string(),
            });
        }

        for (field, value) in [
            ("issuedAt", &self.issued_at),
            ("expirationTime", &self.expiration_time),
            ("notBefore", &self.not_before),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !is_valid_iso8601_date(v)) {
                return Err(SiweError::InvalidTimeFormat {
                    field,
                    received: value.to_string(),
                });
            }
        }

        let free_text = self
            .statement
            .iter()
            .map(|s| ("statement", s))
            .chain(self.request_id.iter().map(|r| ("requestId", r)))
            .chain(self.resources.iter().flatten().map(|r| ("resources", r)));
        for (field, value) in free_text {
            if field == "resources" && value.is_empty() {
                return Err(SiweError::MalformedInput(
                    "resources must not contain empty entries".to_string(),
                ));
            }
            if !is_single_line(value) {
                return Err(SiweError::MalformedInput(format!(
                    "{field} must not contain line breaks"
                )));
            }
        }

        Ok(())
    }

    /// Canonical signable string.
    ///
    /// Validates, fills `nonce` and `issued_at` when absent, then renders.
    /// Calling it again with unchanged fields yields the same string.
    pub fn to_message(&mut self, ctx: &MessageContext) -> Result<String, SiweError> {
        self.validate_message(ctx)?;

        if self.nonce.is_none() {
            self.nonce = Some(generate_nonce(ctx)?);
        }
        if self.issued_at.is_none() {
            self.issued_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        }

        Ok(self.render())
    }

    /// Version-dispatched rendering of the string a wallet signs.
    pub fn prepare_message(&mut self, ctx: &MessageContext) -> Result<String, SiweError> {
        match self.version.as_str() {
            SIWE_VERSION => self.to_message(ctx),
            other => Err(SiweError::InvalidMessageVersion {
                expected: SIWE_VERSION.to_string(),
                received: other.to_string(),
            }),
        }
    }

    fn render(&self) -> String {
        let origin = match &self.scheme {
            Some(scheme) => format!("{scheme}://{}", self.domain),
            None => self.domain.clone(),
        };

        let mut out = format!("{origin}{HEADER_SUFFIX}\n{}\n\n", self.address);
        if let Some(statement) = &self.statement {
            out.push_str(statement);
            out.push('\n');
        }
        out.push('\n');

        let mut body = vec![
            format!("URI: {}", self.uri),
            format!("Version: {}", self.version),
            format!("Chain ID: {}", self.chain_id),
        ];
        if let Some(nonce) = &self.nonce {
            body.push(format!("Nonce: {nonce}"));
        }
        if let Some(issued_at) = &self.issued_at {
            body.push(format!("Issued At: {issued_at}"));
        }
        if let Some(expiration_time) = &self.expiration_time {
            body.push(format!("Expiration Time: {expiration_time}"));
        }
        if let Some(not_before) = &self.not_before {
            body.push(format!("Not Before: {not_before}"));
        }
        if let Some(request_id) = &self.request_id {
            body.push(format!("Request ID: {request_id}"));
        }
        if let Some(resources) = &self.resources {
            body.push("Resources:".to_string());
            body.extend(resources.iter().map(|r| format!("- {r}")));
        }

        out.push_str(&body.join("\n"));
        out
    }
}

/// Fresh nonce from the context's generator, checked against the nonce rule.
pub fn generate_nonce(ctx: &MessageContext) -> Result<String, SiweError> {
    let nonce = ctx.nonces.generate(ctx.nonce_entropy_bits)?;
    if !is_valid_nonce(&nonce) {
        return Err(SiweError::NonceGeneration(format!(
            "generated nonce of length {} does not satisfy the nonce rule",
            nonce.len()
        )));
    }
    Ok(nonce)
}
