//! Principal Entity
//!
//! The authenticated caller of a request, loaded fresh from storage for
//! every request and placed in the request extensions by `require_auth`.

use kernel::role::Role;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Customer or admin id, depending on `role`
    pub id: Uuid,
    pub role: Role,
    pub display_name: Option<String>,
    pub phone_number: String,
}

impl Principal {
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}
