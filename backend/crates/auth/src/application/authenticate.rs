//! Authenticate Use Case
//!
//! Resolves a bearer token to the principal it names.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::role::Role;
use platform::token::TokenSigner;

use crate::domain::entity::principal::Principal;
use crate::domain::repository::PrincipalRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<P>
where
    P: PrincipalRepository,
{
    repo: Arc<P>,
    signer: Arc<TokenSigner>,
}

impl<P> AuthenticateUseCase<P>
where
    P: PrincipalRepository,
{
    pub fn new(repo: Arc<P>, signer: Arc<TokenSigner>) -> Self {
        Self { repo, signer }
    }

    pub async fn execute(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Principal> {
        let claims = self.signer.verify(token, now).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthError::Unauthenticated
        })?;

        let role = Role::from_code(&claims.role).ok_or(AuthError::Unauthenticated)?;

        self.repo
            .find_principal(claims.sub, role)
            .await?
            .ok_or(AuthError::PrincipalNotFound)
    }
}
