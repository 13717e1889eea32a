//! Domain Value Objects

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Phone number in E.164 form, the subject an OTP is issued against
///
/// `+` followed by 2 to 15 digits, the first one non-zero. Surrounding
/// whitespace is ignored; nothing else is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const MIN_DIGITS: usize = 2;
    pub const MAX_DIGITS: usize = 15;

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+')?;

        let valid = (Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit())
            && !digits.starts_with('0');

        valid.then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits without the leading `+`, as SMS gateways expect
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext one-time code
///
/// Lives only between generation and dispatch, or between the request body
/// and hash verification. Never persisted, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct OtpCode(String);

impl OtpCode {
    /// Draw a fresh uniformly distributed code of `length` digits
    pub fn generate(length: u32) -> Self {
        Self(platform::crypto::random_numeric_code(length))
    }

    /// Wrap a code submitted by a client, `None` when blank
    pub fn from_submitted(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"[REDACTED]").finish()
    }
}
