//! # EIP-191 Personal Signatures (secp256k1)
//!
//! Signing and signer recovery for `personal_sign` messages, the scheme
//! wallets use for Sign-In with Ethereum.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: Uses `subtle` crate for the range comparisons
//! - RFC 6979 deterministic nonces when signing

use crate::errors::CryptoError;
use crate::hashing::{keccak256, to_checksum_hex, Hash};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// Ethereum-style address (last 20 bytes of keccak256(pubkey))
pub type Address = [u8; 20];

/// Length of an `r || s || v` signature in bytes.
const SIGNATURE_LEN: usize = 65;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// EIP-191 DIGEST
// =============================================================================

/// Digest signed by `personal_sign`:
/// `keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)`.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut data = Vec::with_capacity(prefix.len() + message.len());
    data.extend_from_slice(prefix.as_bytes());
    data.extend_from_slice(message);
    keccak256(&data)
}

// =============================================================================
// RECOVERY
// =============================================================================

/// Recover the address that produced `signature` over `message` via `personal_sign`.
///
/// `signature` is 65 bytes `r || s || v` in hex, with or without `0x`.
///
/// Validations performed, in order:
/// 1. Hex decoding and length
/// 2. Recovery ID (v) is 0, 1, 27 or 28
/// 3. R and S are in [1, n-1]
/// 4. S is in the lower half of the order (EIP-2)
/// 5. Public key recovery succeeds
pub fn recover_personal_sign(message: &[u8], signature: &str) -> Result<Address, CryptoError> {
    let (r, s, v) = decode_signature(signature)?;

    let recovery_id = parse_recovery_id(v)?;

    if !is_valid_scalar(&r) || !is_valid_scalar(&s) {
        return Err(CryptoError::ScalarOutOfRange);
    }
    if !is_low_s(&s) {
        return Err(CryptoError::MalleableSignature);
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&r);
    sig_bytes[32..].copy_from_slice(&s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|e| CryptoError::InvalidSignatureFormat(e.to_string()))?;

    let digest = personal_message_hash(message);
    let recovered_key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_verifying_key(&recovered_key))
}

/// Derive Ethereum address from public key.
pub fn address_from_verifying_key(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    let pubkey_slice = pubkey_bytes.as_bytes();

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_slice[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

fn decode_signature(signature: &str) -> Result<([u8; 32], [u8; 32], u8), CryptoError> {
    let hex_sig = signature
        .strip_prefix("0x")
        .or_else(|| signature.strip_prefix("0X"))
        .unwrap_or(signature);

    if hex_sig.len() != SIGNATURE_LEN * 2 {
        return Err(CryptoError::InvalidSignatureFormat(format!(
            "expected {} hex chars, got {}",
            SIGNATURE_LEN * 2,
            hex_sig.len()
        )));
    }

    let mut bytes = [0u8; SIGNATURE_LEN];
    hex::decode_to_slice(hex_sig, &mut bytes)
        .map_err(|e| CryptoError::InvalidSignatureFormat(e.to_string()))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..64]);
    let v = bytes[64];
    bytes.zeroize();

    Ok((r, s, v))
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

/// Check if S value is in lower half of curve order (EIP-2).
///
/// Constant-time: the loop never exits early and never branches on data.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s[i] < SECP256K1_HALF_ORDER[i]) as u8);
        let byte_greater = Choice::from((s[i] > SECP256K1_HALF_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((scalar[i] < SECP256K1_ORDER[i]) as u8);
        let byte_greater = Choice::from((scalar[i] > SECP256K1_ORDER[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (!is_zero & less).into()
}

// =============================================================================
// SIGNING
// =============================================================================

/// secp256k1 keypair that signs the way a wallet's `personal_sign` does.
pub struct EthereumKeyPair {
    signing_key: SigningKey,
}

impl EthereumKeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    ///
    /// `SigningKey` zeroizes itself on drop; only the caller's copy is wiped here.
    pub fn from_bytes(mut bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let parsed = SigningKey::from_bytes((&bytes).into());
        bytes.zeroize();
        let signing_key = parsed.map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Raw 20-byte address.
    pub fn address(&self) -> Address {
        address_from_verifying_key(self.signing_key.verifying_key())
    }

    /// EIP-55 checksummed address string.
    pub fn checksum_address(&self) -> String {
        to_checksum_hex(&self.address())
    }

    /// Sign `message` with the EIP-191 prefix and return `0x || r || s || v` hex,
    /// with S normalized low and v in {27, 28}.
    pub fn sign_personal(&self, message: &[u8]) -> Result<String, CryptoError> {
        let digest = personal_message_hash(message);
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        // Flipping S to n - S flips the y-parity of R.
        let (sig, parity) = match sig.normalize_s() {
            Some(normalized) => (normalized, recid.to_byte() ^ 1),
            None => (sig, recid.to_byte()),
        };

        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = (parity & 1) + 27;
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}
