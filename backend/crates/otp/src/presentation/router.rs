//! OTP Router

use std::sync::Arc;

use axum::{Router, routing::post};
use platform::token::TokenSigner;

use crate::application::config::OtpConfig;
use crate::application::credential::CredentialIssuer;
use crate::domain::dispatcher::SmsDispatcher;
use crate::domain::repository::OtpChallengeRepository;
use crate::infra::postgres::PgOtpRepository;
use crate::infra::sms::SmsGateway;
use crate::presentation::handlers::{self, OtpAppState};

/// Create the OTP router with PostgreSQL repository
pub fn otp_router(
    repo: PgOtpRepository,
    sms: SmsGateway,
    signer: TokenSigner,
    config: OtpConfig,
) -> Router {
    otp_router_generic(repo, sms, signer, config)
}

/// Create a generic OTP router for any repository, dispatcher and signer
pub fn otp_router_generic<R, S, C>(repo: R, sms: S, credentials: C, config: OtpConfig) -> Router
where
    R: OtpChallengeRepository + Clone + Send + Sync + 'static,
    S: SmsDispatcher + Clone + Send + Sync + 'static,
    C: CredentialIssuer + Clone + 'static,
{
    let state = OtpAppState {
        repo: Arc::new(repo),
        sms: Arc::new(sms),
        credentials: Arc::new(credentials),
        config: Arc::new(config),
    };

    Router::new()
        .route("/request", post(handlers::request_otp::<R, S, C>))
        .route("/verify", post(handlers::verify_otp::<R, S, C>))
        .with_state(state)
}
