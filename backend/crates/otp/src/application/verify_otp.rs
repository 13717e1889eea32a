//! Verify OTP Use Case
//!
//! `NoChallenge -> Active -> {Verified | Expired | Exhausted}`. An attempt is
//! reserved in storage before the hash comparison, so the budget holds
//! under concurrent guesses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;

use crate::application::config::OtpConfig;
use crate::application::credential::CredentialIssuer;
use crate::domain::repository::OtpChallengeRepository;
use crate::domain::value_objects::{OtpCode, PhoneNumber};
use crate::error::{OtpError, OtpResult};

/// Output DTO for verify OTP
#[derive(Debug, Clone)]
pub struct VerifyOtpOutput {
    pub customer_id: CustomerId,
    pub token: String,
}

/// Verify OTP Use Case
pub struct VerifyOtpUseCase<R, C>
where
    R: OtpChallengeRepository,
    C: CredentialIssuer,
{
    repo: Arc<R>,
    credentials: Arc<C>,
    config: Arc<OtpConfig>,
}

impl<R, C> VerifyOtpUseCase<R, C>
where
    R: OtpChallengeRepository,
    C: CredentialIssuer,
{
    pub fn new(repo: Arc<R>, credentials: Arc<C>, config: Arc<OtpConfig>) -> Self {
        Self {
            repo,
            credentials,
            config,
        }
    }

    pub async fn execute(
        &self,
        raw_phone: &str,
        raw_code: &str,
        now: DateTime<Utc>,
    ) -> OtpResult<VerifyOtpOutput> {
        let code = OtpCode::from_submitted(raw_code).ok_or(OtpError::MalformedRequest)?;
        let phone = PhoneNumber::parse(raw_phone).ok_or(OtpError::InvalidSubject)?;
        let max_attempts = self.config.max_attempts;

        let state = self
            .repo
            .find_state(&phone)
            .await?
            .ok_or(OtpError::NoActiveChallenge)?;
        let challenge = state
            .challenge
            .as_ref()
            .ok_or(OtpError::NoActiveChallenge)?;

        if challenge.is_expired(now) {
            return Err(OtpError::Expired);
        }
        if state.attempts_exhausted(max_attempts) {
            return Err(OtpError::TooManyAttempts);
        }

        let Some(attempt) = self
            .repo
            .reserve_attempt(&phone, &challenge.otp_hash, max_attempts)
            .await?
        else {
            return Err(self.lost_race(&phone).await);
        };

        if !challenge.otp_hash.verify(code.as_bytes(), None) {
            return Err(OtpError::InvalidCode {
                attempts_remaining: max_attempts.saturating_sub(attempt),
            });
        }

        let Some(customer_id) = self.repo.consume(&phone, &challenge.otp_hash).await? else {
            return Err(self.lost_race(&phone).await);
        };

        let token = self.credentials.issue(customer_id, now)?;

        tracing::info!(customer_id = %customer_id, attempt, "OTP verified");

        Ok(VerifyOtpOutput { customer_id, token })
    }

    /// Explain why a conditional write matched nothing
    async fn lost_race(&self, phone: &PhoneNumber) -> OtpError {
        match self.repo.find_state(phone).await {
            Ok(Some(state))
                if state.challenge.is_some()
                    && state.attempts_exhausted(self.config.max_attempts) =>
            {
                OtpError::TooManyAttempts
            }
            Ok(_) => OtpError::NoActiveChallenge,
            Err(e) => e,
        }
    }
}
