//! Admin Sign In Use Case
//!
//! Authenticates an admin panel operator and mints a staff token.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use platform::secret::{ClearTextPassword, HashCost, SecretHash};
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::entity::admin::Admin;
use crate::domain::repository::AdminRepository;
use crate::domain::value_object::login_id::LoginId;
use crate::error::{AuthError, AuthResult};

/// Admin sign in input
pub struct AdminSignInInput {
    pub login_id: String,
    pub password: String,
}

/// Admin sign in output
#[derive(Debug)]
pub struct AdminSignInOutput {
    pub token: String,
    pub admin: Admin,
}

/// Admin sign in use case
pub struct AdminSignInUseCase<A>
where
    A: AdminRepository,
{
    repo: Arc<A>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<A> AdminSignInUseCase<A>
where
    A: AdminRepository,
{
    pub fn new(repo: Arc<A>, signer: Arc<TokenSigner>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            signer,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: AdminSignInInput,
        now: DateTime<Utc>,
    ) -> AuthResult<AdminSignInOutput> {
        if input.login_id.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let admin = match LoginId::parse(&input.login_id) {
            Some(login_id) => self.repo.find_by_login_id(&login_id).await?,
            None => None,
        };

        let password = ClearTextPassword::for_login(input.password);
        let Some(admin) = admin else {
            // Same Argon2 work as a wrong password
            if let Some(pad) = timing_pad(&self.config.hash_cost) {
                pad.verify(password.as_bytes(), self.config.pepper());
            }
            return Err(AuthError::InvalidCredentials);
        };

        if !admin.verify_password(password.as_bytes(), self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self
            .signer
            .sign(admin.admin_id.into_uuid(), admin.role.code(), now)?;

        tracing::info!(
            admin_id = %admin.admin_id,
            role = %admin.role,
            "Admin signed in"
        );

        Ok(AdminSignInOutput {
            token: issued.token,
            admin,
        })
    }
}

/// Hash verified when no admin matches the login id
///
/// Built once per process with the first cost it is asked for.
fn timing_pad(cost: &HashCost) -> Option<&'static SecretHash> {
    static PAD: OnceLock<Option<SecretHash>> = OnceLock::new();
    PAD.get_or_init(|| SecretHash::create(b"no-such-admin", None, cost).ok())
        .as_ref()
}
