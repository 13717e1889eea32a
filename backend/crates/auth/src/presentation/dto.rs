//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, principal::Principal};

// ============================================================================
// Admin Login
// ============================================================================

/// Admin login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminLoginRequest {
    /// Login id, case-insensitive
    pub id: Option<String>,
    pub password: Option<String>,
}

/// Admin profile returned to the admin panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    /// Login id
    pub id: String,
    pub role: String,
    pub display: String,
    pub phone_number: String,
}

impl From<&Admin> for AdminUserDto {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.login_id.to_string(),
            role: admin.role.code().to_string(),
            display: admin.display_name.clone(),
            phone_number: admin.phone_number.clone(),
        }
    }
}

/// Admin login response
#[derive(Debug, Clone, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub token: String,
    pub user: AdminUserDto,
}

// ============================================================================
// Password Reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    pub phone_number: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

// ============================================================================
// Current Principal
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDto {
    pub id: Uuid,
    pub role: String,
    pub display: Option<String>,
    pub phone_number: String,
}

impl From<Principal> for PrincipalDto {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            role: principal.role.code().to_string(),
            display: principal.display_name,
            phone_number: principal.phone_number,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: PrincipalDto,
}
