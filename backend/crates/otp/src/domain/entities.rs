//! Domain Entities
//!
//! OTP state as stored on the customer record.

use chrono::{DateTime, Duration, Utc};
use platform::secret::SecretHash;

/// The code a customer is currently expected to present
///
/// Hash and expiry are set and cleared together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChallenge {
    pub otp_hash: SecretHash,
    pub expires_at: DateTime<Utc>,
}

impl ActiveChallenge {
    /// A code is rejected strictly after its expiry instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// OTP fields of one customer record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpState {
    pub challenge: Option<ActiveChallenge>,
    pub attempt_count: u32,
    pub last_sent_at: Option<DateTime<Utc>>,
}

impl OtpState {
    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }
}

/// A freshly hashed code, ready to be stored
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub otp_hash: SecretHash,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedChallenge {
    pub fn new(otp_hash: SecretHash, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            otp_hash,
            issued_at,
            expires_at: issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// State stored by a successful issuance: attempts reset, cooldown starts
    pub fn to_state(&self) -> OtpState {
        OtpState {
            challenge: Some(ActiveChallenge {
                otp_hash: self.otp_hash.clone(),
                expires_at: self.expires_at,
            }),
            attempt_count: 0,
            last_sent_at: Some(self.issued_at),
        }
    }
}
