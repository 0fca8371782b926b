//! # Field Validators
//!
//! Pure predicates over single SIWE fields. The hashing needed by EIP-55 is
//! delegated to a [`ChecksumHasher`].

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::ports::outbound::ChecksumHasher;

/// The only message version this crate accepts.
pub const SIWE_VERSION: &str = "1";

/// Minimum nonce length.
pub const MIN_NONCE_LENGTH: usize = 8;

lazy_static! {
    static ref ISO8601: Regex = Regex::new(
        r"^(?P<date>[0-9]{4}-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01]))[Tt]([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9]|60)(\.[0-9]+)?(([Zz])|([+-]([01][0-9]|2[0-3]):[0-5][0-9]))$"
    )
    .expect("ISO-8601 pattern compiles");
    static ref NONCE: Regex = Regex::new(r"[a-zA-Z0-9]{8,}").expect("nonce pattern compiles");
    static ref SCHEME: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9+\-.]*$").expect("scheme pattern compiles");
}

/// ISO-8601 date-time that also names a real calendar day.
///
/// The grammar alone accepts `2021-02-30`; re-formatting the parsed date and
/// comparing catches it.
pub fn is_valid_iso8601_date(input: &str) -> bool {
    let Some(caps) = ISO8601.captures(input) else {
        return false;
    };
    let date = &caps["date"];

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|parsed| parsed.format("%Y-%m-%d").to_string() == date)
        .unwrap_or(false)
}

/// EIP-55 casing of `address`.
///
/// The address is lower-cased with any `0x` prefix removed, hashed, and each
/// hex letter upper-cased where the matching digest nibble is >= 8.
pub fn to_checksum_address(address: &str, hasher: &dyn ChecksumHasher) -> String {
    let lower = address.to_lowercase();
    let body = lower.strip_prefix("0x").unwrap_or(&lower);
    let digest = hasher.keccak256(body.as_bytes());

    let mut out = String::with_capacity(body.len() + 2);
    out.push_str("0x");
    for (i, c) in body.chars().enumerate() {
        let nibble = digest
            .get(i / 2)
            .map(|byte| if i % 2 == 0 { byte >> 4 } else { byte & 0x0f })
            .unwrap_or(0);
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether `address` is 42 characters of `0x`-prefixed hex in its own EIP-55 form.
pub fn is_eip55_address(address: &str, hasher: &dyn ChecksumHasher) -> bool {
    if address.len() != 42 || !is_hex_address(address) {
        return false;
    }
    address == to_checksum_address(address, hasher)
}

/// `0x` followed by 40 hex digits, any casing.
pub(crate) fn is_hex_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Non-empty authority: no `#`, no `?`, no whitespace.
///
/// A `scheme://` prefix belongs in the message's `scheme` field.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.contains("://")
        && !domain.contains('#')
        && !domain.contains('?')
        && !domain.chars().any(char::is_whitespace)
}

/// RFC 3986 scheme name.
pub fn is_valid_scheme(scheme: &str) -> bool {
    SCHEME.is_match(scheme)
}

/// Alphanumeric and at least 8 characters, with no other characters anywhere.
pub fn is_valid_nonce(nonce: &str) -> bool {
    NONCE
        .find(nonce)
        .is_some_and(|m| nonce.len() >= MIN_NONCE_LENGTH && m.as_str() == nonce)
}

/// Whether `version` is the supported message version.
pub fn is_valid_version(version: &str) -> bool {
    version == SIWE_VERSION
}

/// Free-text fields must stay on one line.
pub(crate) fn is_single_line(value: &str) -> bool {
    !value.contains('\n') && !value.contains('\r')
}
