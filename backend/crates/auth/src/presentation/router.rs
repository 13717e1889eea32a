//! Auth Router

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AdminRepository, PrincipalRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{ADMIN_ONLY, require_auth, require_role};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, signer: TokenSigner, config: AuthConfig) -> Router {
    auth_router_generic(repo, signer, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, signer: TokenSigner, config: AuthConfig) -> Router
where
    R: AdminRepository + PrincipalRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        signer: Arc::new(signer),
        config: Arc::new(config),
    };

    let admin_only = Router::new()
        .route(
            "/admin/reset-password",
            post(handlers::reset_admin_password::<R>),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_role(ADMIN_ONLY, req, next)
        }));

    let authenticated = Router::new()
        .route("/me", get(handlers::me))
        .merge(admin_only)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R>,
        ));

    Router::new()
        .route("/admin-login", post(handlers::admin_login::<R>))
        .merge(authenticated)
        .with_state(state)
}
