//! Reset Admin Password Use Case
//!
//! An authenticated admin sets a new password for the admin registered
//! under a phone number.

use std::sync::Arc;

use kernel::role::Role;
use platform::secret::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::AdminRepository;
use crate::error::{AuthError, AuthResult};

pub struct ResetAdminPasswordInput {
    pub phone_number: String,
    pub new_password: String,
}

pub struct ResetAdminPasswordUseCase<A>
where
    A: AdminRepository,
{
    repo: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> ResetAdminPasswordUseCase<A>
where
    A: AdminRepository,
{
    pub fn new(repo: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, actor: &Principal, input: ResetAdminPasswordInput) -> AuthResult<()> {
        // Also enforced by the router's role guard
        if actor.role != Role::Admin {
            return Err(AuthError::InsufficientPermissions);
        }

        let phone_number = input.phone_number.trim();
        if phone_number.is_empty() || input.new_password.is_empty() {
            return Err(AuthError::MalformedResetRequest);
        }

        let password = ClearTextPassword::new(input.new_password)?;

        let admin = self
            .repo
            .find_by_phone_number(phone_number)
            .await?
            .ok_or(AuthError::AdminNotFound)?;

        let hash = password
            .hash(self.config.pepper(), &self.config.hash_cost)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !self.repo.update_password(&admin.admin_id, &hash).await? {
            return Err(AuthError::AdminNotFound);
        }

        tracing::info!(
            admin_id = %admin.admin_id,
            actor_id = %actor.id,
            "Admin password reset"
        );

        Ok(())
    }
}
