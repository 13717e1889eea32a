//! PostgreSQL Repository Implementations
//!
//! OTP state lives in the `otp_*` columns of `customers`. Every mutation is
//! one conditional statement so the database arbitrates concurrent requests.

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;
use platform::secret::SecretHash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{ActiveChallenge, IssuedChallenge, OtpState};
use crate::domain::repository::{IssueOutcome, OtpChallengeRepository};
use crate::domain::value_objects::PhoneNumber;
use crate::error::{OtpError, OtpResult};

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clear challenges whose expiry has passed
    ///
    /// Attempt counts go with them; `otp_last_sent_at` is kept so the
    /// cooldown still applies.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> OtpResult<u64> {
        let cleared = sqlx::query(
            r#"
            UPDATE customers
            SET otp_hash = NULL,
                otp_expires_at = NULL,
                otp_attempt_count = 0,
                updated_at = now()
            WHERE otp_expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        tracing::info!(cleared, "Purged expired OTP challenges");

        Ok(cleared)
    }
}

impl OtpChallengeRepository for PgOtpRepository {
    async fn find_state(&self, phone: &PhoneNumber) -> OtpResult<Option<OtpState>> {
        let row = sqlx::query_as::<_, OtpStateRow>(
            r#"
            SELECT otp_hash, otp_expires_at, otp_attempt_count, otp_last_sent_at
            FROM customers
            WHERE phone_number = $1
            "#,
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OtpStateRow::into_state).transpose()
    }

    async fn issue(
        &self,
        phone: &PhoneNumber,
        challenge: &IssuedChallenge,
        cooldown_cutoff: DateTime<Utc>,
    ) -> OtpResult<IssueOutcome> {
        // The locked pre-image is what a failed dispatch rolls back to
        let issued = sqlx::query_as::<_, IssuedRow>(
            r#"
            WITH prior AS (
                SELECT otp_hash, otp_expires_at, otp_attempt_count, otp_last_sent_at
                FROM customers
                WHERE phone_number = $2
                FOR UPDATE
            )
            INSERT INTO customers (
                customer_id,
                phone_number,
                otp_hash,
                otp_expires_at,
                otp_attempt_count,
                otp_last_sent_at
            ) VALUES ($1, $2, $3, $4, 0, $5)
            ON CONFLICT (phone_number) DO UPDATE SET
                otp_hash = EXCLUDED.otp_hash,
                otp_expires_at = EXCLUDED.otp_expires_at,
                otp_attempt_count = 0,
                otp_last_sent_at = EXCLUDED.otp_last_sent_at,
                updated_at = now()
            WHERE customers.otp_last_sent_at IS NULL
               OR customers.otp_last_sent_at <= $6
            RETURNING
                customer_id,
                (SELECT otp_hash FROM prior) AS otp_hash,
                (SELECT otp_expires_at FROM prior) AS otp_expires_at,
                COALESCE((SELECT otp_attempt_count FROM prior), 0) AS otp_attempt_count,
                (SELECT otp_last_sent_at FROM prior) AS otp_last_sent_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone.as_str())
        .bind(challenge.otp_hash.as_phc_string())
        .bind(challenge.expires_at)
        .bind(challenge.issued_at)
        .bind(cooldown_cutoff)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = issued {
            return Ok(IssueOutcome::Issued {
                customer_id: CustomerId::from_uuid(row.customer_id),
                previous: row.prior.into_state()?,
            });
        }

        // Conflict row exists but is still cooling down
        let last_sent_at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT otp_last_sent_at FROM customers WHERE phone_number = $1",
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?
        .flatten()
        .unwrap_or(cooldown_cutoff);

        tracing::warn!(phone = %phone, "Concurrent OTP issuance lost the race");

        Ok(IssueOutcome::CoolingDown { last_sent_at })
    }

    async fn restore(
        &self,
        phone: &PhoneNumber,
        issued_hash: &SecretHash,
        previous: &OtpState,
    ) -> OtpResult<bool> {
        let (otp_hash, otp_expires_at) = match &previous.challenge {
            Some(c) => (Some(c.otp_hash.as_phc_string()), Some(c.expires_at)),
            None => (None, None),
        };

        let restored = sqlx::query(
            r#"
            UPDATE customers
            SET otp_hash = $3,
                otp_expires_at = $4,
                otp_attempt_count = $5,
                otp_last_sent_at = $6,
                updated_at = now()
            WHERE phone_number = $1 AND otp_hash = $2
            "#,
        )
        .bind(phone.as_str())
        .bind(issued_hash.as_phc_string())
        .bind(otp_hash)
        .bind(otp_expires_at)
        .bind(i32::try_from(previous.attempt_count).unwrap_or(i32::MAX))
        .bind(previous.last_sent_at)
        .execute(&self.pool)
        .await?
        .rows_affected()
            == 1;

        Ok(restored)
    }

    async fn reserve_attempt(
        &self,
        phone: &PhoneNumber,
        otp_hash: &SecretHash,
        max_attempts: u32,
    ) -> OtpResult<Option<u32>> {
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE customers
            SET otp_attempt_count = otp_attempt_count + 1,
                updated_at = now()
            WHERE phone_number = $1
              AND otp_hash = $2
              AND otp_attempt_count < $3
            RETURNING otp_attempt_count
            "#,
        )
        .bind(phone.as_str())
        .bind(otp_hash.as_phc_string())
        .bind(i32::try_from(max_attempts).unwrap_or(i32::MAX))
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|c| c.max(0) as u32))
    }

    async fn consume(
        &self,
        phone: &PhoneNumber,
        otp_hash: &SecretHash,
    ) -> OtpResult<Option<CustomerId>> {
        let customer_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE customers
            SET otp_hash = NULL,
                otp_expires_at = NULL,
                otp_attempt_count = 0,
                updated_at = now()
            WHERE phone_number = $1 AND otp_hash = $2
            RETURNING customer_id
            "#,
        )
        .bind(phone.as_str())
        .bind(otp_hash.as_phc_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer_id.map(CustomerId::from_uuid))
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct IssuedRow {
    customer_id: Uuid,
    #[sqlx(flatten)]
    prior: OtpStateRow,
}

#[derive(sqlx::FromRow)]
struct OtpStateRow {
    otp_hash: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    otp_attempt_count: i32,
    otp_last_sent_at: Option<DateTime<Utc>>,
}

impl OtpStateRow {
    fn into_state(self) -> OtpResult<OtpState> {
        let challenge = match (self.otp_hash, self.otp_expires_at) {
            (Some(hash), Some(expires_at)) => Some(ActiveChallenge {
                otp_hash: SecretHash::from_phc_string(hash)
                    .map_err(|e| OtpError::Internal(e.to_string()))?,
                expires_at,
            }),
            _ => None,
        };

        Ok(OtpState {
            challenge,
            attempt_count: self.otp_attempt_count.max(0) as u32,
            last_sent_at: self.otp_last_sent_at,
        })
    }
}
