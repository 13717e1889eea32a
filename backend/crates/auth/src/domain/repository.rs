//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::AdminId;
use kernel::role::Role;
use platform::secret::SecretHash;
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, principal::Principal};
use crate::domain::value_object::login_id::LoginId;
use crate::error::AuthResult;

/// Admin repository trait
#[trait_variant::make(AdminRepository: Send)]
pub trait LocalAdminRepository {
    /// Find admin by normalized login id
    async fn find_by_login_id(&self, login_id: &LoginId) -> AuthResult<Option<Admin>>;

    /// Find admin by phone number
    async fn find_by_phone_number(&self, phone_number: &str) -> AuthResult<Option<Admin>>;

    /// Replace the password hash, `false` when the admin no longer exists
    async fn update_password(&self, admin_id: &AdminId, hash: &SecretHash) -> AuthResult<bool>;
}

/// Principal lookup for token subjects
#[trait_variant::make(PrincipalRepository: Send)]
pub trait LocalPrincipalRepository {
    /// Load the subject of a token
    ///
    /// `Customer` subjects are looked up among customers, staff roles among
    /// admins. A staff principal carries the role currently stored, not the
    /// one in the token.
    async fn find_principal(&self, subject: Uuid, role: Role) -> AuthResult<Option<Principal>>;
}
