//! HTTP Handlers

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::{
    AdminSignInInput, AdminSignInUseCase, ResetAdminPasswordInput, ResetAdminPasswordUseCase,
};
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AdminRepository, PrincipalRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AdminLoginRequest, AdminLoginResponse, AdminUserDto, MeResponse, MessageResponse,
    ResetPasswordRequest,
};

/// Shared state for auth handlers and middleware
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AdminRepository + PrincipalRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub signer: Arc<TokenSigner>,
    pub config: Arc<AuthConfig>,
}

/// POST /api/user/admin-login
pub async fn admin_login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<AdminLoginRequest>,
) -> AuthResult<Json<AdminLoginResponse>>
where
    R: AdminRepository + PrincipalRepository + Clone + Send + Sync + 'static,
{
    let (Some(login_id), Some(password)) = (req.id, req.password) else {
        return Err(AuthError::MissingCredentials);
    };

    let use_case = AdminSignInUseCase::new(
        state.repo.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(AdminSignInInput { login_id, password }, Utc::now())
        .await?;

    Ok(Json(AdminLoginResponse {
        success: true,
        token: output.token,
        user: AdminUserDto::from(&output.admin),
    }))
}

/// POST /api/user/admin/reset-password
pub async fn reset_admin_password<R>(
    State(state): State<AuthAppState<R>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AdminRepository + PrincipalRepository + Clone + Send + Sync + 'static,
{
    let (Some(phone_number), Some(new_password)) = (req.phone_number, req.new_password) else {
        return Err(AuthError::MalformedResetRequest);
    };

    let use_case = ResetAdminPasswordUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(
            &principal,
            ResetAdminPasswordInput {
                phone_number,
                new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password reset successfully",
    }))
}

/// GET /api/user/me
pub async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: principal.into(),
    })
}
