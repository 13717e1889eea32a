//! Request OTP Use Case

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;
use platform::secret::SecretHash;

use crate::application::config::OtpConfig;
use crate::domain::dispatcher::SmsDispatcher;
use crate::domain::entities::IssuedChallenge;
use crate::domain::repository::{IssueOutcome, OtpChallengeRepository};
use crate::domain::value_objects::{OtpCode, PhoneNumber};
use crate::error::{OtpError, OtpResult};

/// Output DTO for request OTP
#[derive(Debug, Clone)]
pub struct RequestOtpOutput {
    pub customer_id: CustomerId,
    /// Seconds before the client may ask again
    pub cooldown_seconds: u64,
    pub expires_at: DateTime<Utc>,
}

/// Request OTP Use Case
pub struct RequestOtpUseCase<R, S>
where
    R: OtpChallengeRepository,
    S: SmsDispatcher,
{
    repo: Arc<R>,
    sms: Arc<S>,
    config: Arc<OtpConfig>,
}

impl<R, S> RequestOtpUseCase<R, S>
where
    R: OtpChallengeRepository,
    S: SmsDispatcher,
{
    pub fn new(repo: Arc<R>, sms: Arc<S>, config: Arc<OtpConfig>) -> Self {
        Self { repo, sms, config }
    }

    pub async fn execute(&self, raw_phone: &str, now: DateTime<Utc>) -> OtpResult<RequestOtpOutput> {
        let phone = PhoneNumber::parse(raw_phone).ok_or(OtpError::InvalidSubject)?;
        let cooldown = self.config.cooldown();

        // Cheap pre-check so a cooling-down client costs no hashing
        let last_sent_at = self
            .repo
            .find_state(&phone)
            .await?
            .and_then(|state| state.last_sent_at);
        if let Some(remaining_secs) = cooldown.remaining(now, last_sent_at) {
            return Err(OtpError::Cooldown { remaining_secs });
        }

        let code = OtpCode::generate(self.config.code_length);
        let otp_hash = SecretHash::create(code.as_bytes(), None, &self.config.hash_cost)
            .map_err(|e| OtpError::Internal(e.to_string()))?;
        let challenge = IssuedChallenge::new(otp_hash, now, self.config.ttl_chrono());

        let (customer_id, previous) = match self
            .repo
            .issue(&phone, &challenge, cooldown.cutoff(now))
            .await?
        {
            IssueOutcome::Issued {
                customer_id,
                previous,
            } => (customer_id, previous),
            IssueOutcome::CoolingDown { last_sent_at } => {
                // Lost the race to a concurrent request
                let remaining_secs = cooldown.remaining(now, Some(last_sent_at)).unwrap_or(1);
                return Err(OtpError::Cooldown { remaining_secs });
            }
        };

        if !self.sms.send_code(&phone, &code).await {
            match self.repo.restore(&phone, &challenge.otp_hash, &previous).await {
                Ok(true) => {
                    tracing::info!(customer_id = %customer_id, "Undelivered OTP rolled back");
                }
                Ok(false) => {
                    tracing::warn!(customer_id = %customer_id, "Undelivered OTP already superseded");
                }
                Err(e) => {
                    tracing::error!(customer_id = %customer_id, error = %e, "Failed to roll back undelivered OTP");
                }
            }
            return Err(OtpError::DispatchFailed);
        }

        tracing::info!(
            customer_id = %customer_id,
            expires_at = %challenge.expires_at,
            "OTP issued"
        );

        Ok(RequestOtpOutput {
            customer_id,
            cooldown_seconds: cooldown.window_secs(),
            expires_at: challenge.expires_at,
        })
    }
}
