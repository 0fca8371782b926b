//! # Keccak-256 Hashing
//!
//! The original (pre-NIST padding) Keccak used throughout Ethereum.

use sha3::{Digest, Keccak256};

/// Keccak-256 output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with Keccak-256 (one-shot).
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash data with Keccak-256 and return the lowercase hex digest (no `0x`).
pub fn keccak256_hex(data: &[u8]) -> String {
    hex::encode(keccak256(data))
}

/// EIP-55 mixed-case encoding of a raw 20-byte address.
///
/// Each hex letter is upper-cased when the matching nibble of
/// `keccak256(lowercase_hex)` is 8 or above.
pub fn to_checksum_hex(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
