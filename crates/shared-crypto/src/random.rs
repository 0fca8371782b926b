//! # Random Tokens
//!
//! Alphanumeric strings drawn from the operating system CSPRNG.

use crate::errors::CryptoError;
use rand::rngs::OsRng;
use rand::RngCore;

/// Character set of generated tokens.
pub const ALPHANUMERIC: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Largest multiple of 62 that fits in a byte; bytes at or above it are
/// rejected to keep the distribution uniform.
const REJECTION_LIMIT: u8 = 248;

/// Upper bound on requested entropy.
const MAX_ENTROPY_BITS: u32 = 4096;

/// Generate a random alphanumeric string carrying at least `bits` of entropy.
///
/// Length is `ceil(bits / log2(62))`, so 96 bits yields 17 characters.
pub fn random_string_for_entropy(bits: u32) -> Result<String, CryptoError> {
    if bits == 0 || bits > MAX_ENTROPY_BITS {
        return Err(CryptoError::InvalidEntropy { bits });
    }

    let length = (f64::from(bits) / (ALPHANUMERIC.len() as f64).log2()).ceil() as usize;
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while out.len() < length {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CryptoError::RandomSource(e.to_string()))?;

        for &byte in buf.iter().filter(|&&b| b < REJECTION_LIMIT) {
            if out.len() == length {
                break;
            }
            out.push(ALPHANUMERIC[(byte % 62) as usize] as char);
        }
    }

    Ok(out)
}
