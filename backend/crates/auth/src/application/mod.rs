//! Application Layer
//!
//! Use cases and application services.

pub mod admin_sign_in;
pub mod authenticate;
pub mod config;
pub mod reset_admin_password;

// Re-exports
pub use admin_sign_in::{AdminSignInInput, AdminSignInOutput, AdminSignInUseCase};
pub use authenticate::AuthenticateUseCase;
pub use config::AuthConfig;
pub use reset_admin_password::{ResetAdminPasswordInput, ResetAdminPasswordUseCase};
