//! Application Configuration
//!
//! Configuration for the OTP application layer.

use std::time::Duration;

use platform::secret::HashCost;
use thiserror::Error;

use crate::domain::services::ResendCooldown;

/// Shortest code length the SMS gateway accepts
pub const MIN_CODE_LENGTH: u32 = 4;

/// Longest code length (keeps `10^len` within `u32`)
pub const MAX_CODE_LENGTH: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpConfigError {
    #[error("OTP length must be between {MIN_CODE_LENGTH} and {MAX_CODE_LENGTH} (got {0})")]
    CodeLength(u32),

    #[error("OTP TTL must be positive")]
    ZeroTtl,

    #[error("OTP max attempts must be positive")]
    ZeroMaxAttempts,

    #[error("Invalid OTP hash cost: {0}")]
    HashCost(String),
}

/// OTP application configuration
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Number of digits per code
    pub code_length: u32,
    /// How long an issued code stays acceptable
    pub ttl: Duration,
    /// Minimum wait between two codes for one phone number (0 disables)
    pub resend_cooldown: Duration,
    /// Verification attempts allowed per issued code
    pub max_attempts: u32,
    /// Argon2id cost for code hashes
    pub hash_cost: HashCost,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl: Duration::from_secs(300),
            resend_cooldown: Duration::from_secs(30),
            max_attempts: 5,
            hash_cost: HashCost::default(),
        }
    }
}

impl OtpConfig {
    pub fn validate(&self) -> Result<(), OtpConfigError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(OtpConfigError::CodeLength(self.code_length));
        }
        if self.ttl.is_zero() {
            return Err(OtpConfigError::ZeroTtl);
        }
        if self.max_attempts == 0 {
            return Err(OtpConfigError::ZeroMaxAttempts);
        }
        self.hash_cost
            .validate()
            .map_err(|e| OtpConfigError::HashCost(e.to_string()))
    }

    pub fn ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX)
    }

    pub fn cooldown(&self) -> ResendCooldown {
        ResendCooldown::new(
            chrono::Duration::from_std(self.resend_cooldown).unwrap_or(chrono::Duration::MAX),
        )
    }
}
