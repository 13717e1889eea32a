//! Secret Hashing and Verification
//!
//! Salted, memory-hard hashing for short-lived OTP codes and for admin
//! passwords:
//! - Argon2id with tunable cost, stored as PHC strings
//! - Zeroization of clear text on drop
//! - Optional application-wide pepper
//! - NIST SP 800-63B password policy for admin credentials

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Hashing/verification errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid secret hash format")]
    InvalidHashFormat,

    #[error("Invalid hash cost: {0}")]
    InvalidCost(String),
}

// ============================================================================
// Hash Cost
// ============================================================================

/// Argon2id cost parameters
///
/// Defaults follow the OWASP baseline (m=19456 KiB, t=2, p=1). Tests use a
/// much cheaper setting to keep the suite fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Check the parameters are accepted by Argon2
    pub fn validate(&self) -> Result<(), SecretHashError> {
        self.params().map(|_| ())
    }

    fn params(&self) -> Result<Params, SecretHashError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| SecretHashError::InvalidCost(e.to_string()))
    }

    fn hasher(&self) -> Result<Argon2<'static>, SecretHashError> {
        Ok(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.params()?,
        ))
    }
}

// ============================================================================
// Secret Hash (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
///
/// The PHC string carries its own salt and parameters, so verification does
/// not depend on the current [`HashCost`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash {
    phc: String,
}

impl SecretHash {
    /// Hash `secret` with a fresh random salt
    pub fn create(
        secret: &[u8],
        pepper: Option<&[u8]>,
        cost: &HashCost,
    ) -> Result<Self, SecretHashError> {
        let material = peppered(secret, pepper);
        let salt = SaltString::generate(OsRng);

        let hash = cost
            .hasher()?
            .hash_password(&material, &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(Self {
            phc: hash.to_string(),
        })
    }

    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let phc = s.into();
        PasswordHash::new(&phc).map_err(|_| SecretHashError::InvalidHashFormat)?;
        Ok(Self { phc })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.phc
    }

    /// Verify `secret` against this hash
    ///
    /// Argon2 compares digests in constant time. A malformed stored hash
    /// never verifies.
    pub fn verify(&self, secret: &[u8], pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        let material = peppered(secret, pepper);

        Argon2::default()
            .verify_password(&material, &parsed)
            .is_ok()
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHash").field("phc", &"[HASH]").finish()
    }
}

fn peppered(secret: &[u8], pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
    let mut material = Zeroizing::new(secret.to_vec());
    if let Some(p) = pepper {
        material.extend_from_slice(p);
    }
    material
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Admin password in clear text, validated and zeroized on drop
///
/// Not `Clone`. Debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a new password against the NIST SP 800-63B policy
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Unicode code points, not bytes
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(&normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(Self(normalized))
    }

    /// Wrap a submitted login password without applying the policy
    ///
    /// Sign-in must check whatever the admin typed, including passwords set
    /// before the current policy existed. Only NFKC normalization is applied
    /// so the bytes match what [`ClearTextPassword::new`] stored.
    pub fn for_login(raw: String) -> Self {
        Self(raw.nfkc().collect())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    pub fn hash(&self, pepper: Option<&[u8]>, cost: &HashCost) -> Result<SecretHash, SecretHashError> {
        SecretHash::create(self.as_bytes(), pepper, cost)
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next()
        && chars.all(|c| c == first)
    {
        return true;
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "qazwsx", "1qaz2wsx"];
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "welcome1",
        "admin123",
        "admin1234",
        "iloveyou",
        "sunshine",
        "football",
        "trustno1",
    ];

    COMMON_PASSWORDS.contains(&lower.as_str())
}

fn is_sequential_numbers(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 4 {
        return false;
    }

    let is_ascending = digits
        .windows(2)
        .all(|w| w[1] == w[0] + 1 || (w[0] == 9 && w[1] == 0));
    let is_descending = digits
        .windows(2)
        .all(|w| w[0] == w[1] + 1 || (w[0] == 0 && w[1] == 9));

    is_ascending || is_descending
}

// ============================================================================
// Tests
// ============================================================================
