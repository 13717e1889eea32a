//! OTP (One-Time Password) Backend Module
//!
//! Phone-number sign-in for the storefront.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, cooldown arithmetic, ports
//! - `application/` - Use cases (request, verify) and the credential seam
//! - `infra/` - PostgreSQL repository, SMS gateway clients
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Codes come from the OS CSPRNG and are stored only as Argon2id hashes
//! - Issuance is one conditional upsert, so a cooldown cannot be raced
//! - An attempt is spent in storage before the hash is compared
//! - A verified code is consumed atomically and can be redeemed once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::OtpConfig;
pub use error::{OtpError, OtpResult};
pub use infra::postgres::PgOtpRepository;
pub use infra::sms::{ConsoleSms, SmsGateway, TwoFactorSms};
pub use presentation::router::otp_router;
