//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every mutating operation is a single conditional statement against the
//! customer record, so concurrent requests for one phone number cannot
//! double-send, over-spend the attempt budget, or redeem a code twice.

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;
use platform::secret::SecretHash;

use crate::domain::entities::{IssuedChallenge, OtpState};
use crate::domain::value_objects::PhoneNumber;
use crate::error::OtpResult;

/// Result of an atomic issuance attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The challenge was stored; the record was created if it did not exist
    ///
    /// `previous` holds the OTP fields as they were immediately before this
    /// write, read under the same lock.
    Issued {
        customer_id: CustomerId,
        previous: OtpState,
    },
    /// Another issuance sent a code after the cutoff; nothing was written
    CoolingDown { last_sent_at: DateTime<Utc> },
}

/// OTP challenge repository trait
#[trait_variant::make(OtpChallengeRepository: Send)]
pub trait LocalOtpChallengeRepository {
    /// Read the OTP fields for a phone number
    async fn find_state(&self, phone: &PhoneNumber) -> OtpResult<Option<OtpState>>;

    /// Store a new challenge unless a code was sent after `cooldown_cutoff`
    ///
    /// Overwrites hash and expiry, resets the attempt count and stamps
    /// `last_sent_at`, all or nothing.
    async fn issue(
        &self,
        phone: &PhoneNumber,
        challenge: &IssuedChallenge,
        cooldown_cutoff: DateTime<Utc>,
    ) -> OtpResult<IssueOutcome>;

    /// Put `previous` back, only while `issued_hash` is still the stored hash
    ///
    /// `previous` must be the pre-image returned by [`IssueOutcome::Issued`];
    /// an earlier read may hold a code that has since been redeemed.
    async fn restore(
        &self,
        phone: &PhoneNumber,
        issued_hash: &SecretHash,
        previous: &OtpState,
    ) -> OtpResult<bool>;

    /// Spend one attempt against `otp_hash`
    ///
    /// Returns the new count, or `None` when the hash is no longer current
    /// or the budget is already spent.
    async fn reserve_attempt(
        &self,
        phone: &PhoneNumber,
        otp_hash: &SecretHash,
        max_attempts: u32,
    ) -> OtpResult<Option<u32>>;

    /// Clear the challenge if `otp_hash` is still current
    ///
    /// At most one caller wins; the winner gets the customer id.
    async fn consume(
        &self,
        phone: &PhoneNumber,
        otp_hash: &SecretHash,
    ) -> OtpResult<Option<CustomerId>>;
}
