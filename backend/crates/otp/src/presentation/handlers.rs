//! HTTP Handlers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use chrono::Utc;
use platform::client::extract_client_ip;
use tracing::Instrument;

use crate::application::config::OtpConfig;
use crate::application::credential::CredentialIssuer;
use crate::application::request_otp::RequestOtpUseCase;
use crate::application::verify_otp::VerifyOtpUseCase;
use crate::domain::dispatcher::SmsDispatcher;
use crate::domain::repository::OtpChallengeRepository;
use crate::error::{OtpError, OtpResult};
use crate::presentation::dto::{
    RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest, VerifyOtpResponse,
};

/// Shared state for OTP handlers
#[derive(Clone)]
pub struct OtpAppState<R, S, C>
where
    R: OtpChallengeRepository + Clone + Send + Sync + 'static,
    S: SmsDispatcher + Clone + Send + Sync + 'static,
    C: CredentialIssuer + Clone + 'static,
{
    pub repo: Arc<R>,
    pub sms: Arc<S>,
    pub credentials: Arc<C>,
    pub config: Arc<OtpConfig>,
}

/// POST /api/sms/request
pub async fn request_otp<R, S, C>(
    State(state): State<OtpAppState<R, S, C>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<RequestOtpRequest>,
) -> OtpResult<Json<RequestOtpResponse>>
where
    R: OtpChallengeRepository + Clone + Send + Sync + 'static,
    S: SmsDispatcher + Clone + Send + Sync + 'static,
    C: CredentialIssuer + Clone + 'static,
{
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let span = tracing::info_span!("otp_request", client_ip = ?client_ip);

    let use_case =
        RequestOtpUseCase::new(state.repo.clone(), state.sms.clone(), state.config.clone());

    let phone = req.phone_number.unwrap_or_default();
    let output = use_case.execute(&phone, Utc::now()).instrument(span).await?;

    Ok(Json(RequestOtpResponse {
        success: true,
        message: "OTP sent via SMS",
        cooldown_seconds: output.cooldown_seconds,
    }))
}

/// POST /api/sms/verify
pub async fn verify_otp<R, S, C>(
    State(state): State<OtpAppState<R, S, C>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<VerifyOtpRequest>,
) -> OtpResult<Json<VerifyOtpResponse>>
where
    R: OtpChallengeRepository + Clone + Send + Sync + 'static,
    S: SmsDispatcher + Clone + Send + Sync + 'static,
    C: CredentialIssuer + Clone + 'static,
{
    let (Some(phone), Some(code)) = (req.phone_number, req.otp) else {
        return Err(OtpError::MalformedRequest);
    };

    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let span = tracing::info_span!("otp_verify", client_ip = ?client_ip);

    let use_case = VerifyOtpUseCase::new(
        state.repo.clone(),
        state.credentials.clone(),
        state.config.clone(),
    );

    let code = code.into_string();
    let output = use_case
        .execute(&phone, &code, Utc::now())
        .instrument(span)
        .await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        token: output.token,
    }))
}
