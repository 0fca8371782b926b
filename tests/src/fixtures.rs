//! # Test Fixtures
//!
//! Builders for messages signed by real secp256k1 keys.

use chrono::{DateTime, Utc};
use shared_crypto::EthereumKeyPair;
use siwe_core::{MessageFields, SiweApi, SiweMessage, SiweService};

pub const DOMAIN: &str = "example.com";
pub const URI: &str = "https://example.com/login";
pub const STATEMENT: &str = "Sign in to Example with your Ethereum account.";

/// A message, its canonical text, and a signature by its own address.
pub struct SignedMessage {
    pub keypair: EthereumKeyPair,
    pub message: SiweMessage,
    pub text: String,
    pub signature: String,
}

/// Minimal valid fields for `address`; the nonce is left to the generator.
pub fn base_fields(address: &str) -> MessageFields {
    MessageFields {
        domain: DOMAIN.to_string(),
        address: address.to_string(),
        statement: Some(STATEMENT.to_string()),
        uri: URI.to_string(),
        version: "1".to_string(),
        ..Default::default()
    }
}

/// Sign `fields` (with the keypair's address filled in) using a fresh key.
pub fn signed_message(
    service: &SiweService,
    customize: impl FnOnce(&mut MessageFields),
) -> SignedMessage {
    sign_with(service, EthereumKeyPair::generate(), customize)
}

/// Sign `fields` (with the keypair's address filled in) using `keypair`.
pub fn sign_with(
    service: &SiweService,
    keypair: EthereumKeyPair,
    customize: impl FnOnce(&mut MessageFields),
) -> SignedMessage {
    let mut fields = base_fields(&keypair.checksum_address());
    customize(&mut fields);

    let mut message = service
        .create_message(fields.into())
        .expect("fixture fields are valid");
    let text = service
        .prepare_message(&mut message)
        .expect("fixture message renders");
    let signature = keypair
        .sign_personal(text.as_bytes())
        .expect("fixture key signs");

    SignedMessage {
        keypair,
        message,
        text,
        signature,
    }
}

/// Parse an RFC 3339 instant.
pub fn instant(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .expect("fixture instant is RFC 3339")
        .with_timezone(&Utc)
}
