//! Auth Middleware
//!
//! `require_auth` resolves the bearer token to a [`Principal`] and stores it
//! in the request extensions. `require_role` runs after it and checks the
//! stored principal.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use kernel::role::Role;
use platform::bearer::extract_bearer_token;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{AdminRepository, PrincipalRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Roles allowed to manage admin accounts
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Middleware that requires a valid bearer token
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AdminRepository + PrincipalRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers()).ok_or(AuthError::Unauthenticated)?;

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.signer.clone());
    let principal = use_case.execute(&token, Utc::now()).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Middleware that requires the authenticated principal to hold one of
/// `allowed`
///
/// Must be layered inside [`require_auth`]; a request without a principal
/// is treated as unauthenticated.
pub async fn require_role(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AuthError::Unauthenticated)?;

    if !principal.has_any_role(allowed) {
        tracing::warn!(
            principal_id = %principal.id,
            role = %principal.role,
            "Role not permitted"
        );
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(req).await)
}
