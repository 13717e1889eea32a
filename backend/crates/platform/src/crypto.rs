//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Longest numeric code whose range still fits in a `u64`
pub const MAX_NUMERIC_CODE_DIGITS: u32 = 19;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a zero-padded numeric code, uniform over `[0, 10^digits)`
///
/// `digits` is clamped to `1..=MAX_NUMERIC_CODE_DIGITS`. `gen_range` rejects
/// out-of-range samples instead of reducing modulo, so there is no bias
/// towards low codes.
pub fn random_numeric_code(digits: u32) -> String {
    let digits = digits.clamp(1, MAX_NUMERIC_CODE_DIGITS);
    let max = 10u64.pow(digits);
    let n = OsRng.gen_range(0..max);
    format!("{:0width$}", n, width = digits as usize)
}

/// Encode bytes as unpadded base64url
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn verify_hmac_sha256(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}
