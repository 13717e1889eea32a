//! Admin Entity
//!
//! An admin panel operator. Provisioned by operators, never self-registered.

use kernel::id::AdminId;
use kernel::role::Role;
use platform::secret::SecretHash;

use crate::domain::value_object::login_id::LoginId;

#[derive(Debug, Clone)]
pub struct Admin {
    pub admin_id: AdminId,
    pub login_id: LoginId,
    pub display_name: String,
    pub phone_number: String,
    /// Always a staff role
    pub role: Role,
    pub password_hash: SecretHash,
}

impl Admin {
    /// Check a submitted password against the stored hash
    pub fn verify_password(&self, password: &[u8], pepper: Option<&[u8]>) -> bool {
        self.password_hash.verify(password, pepper)
    }
}
