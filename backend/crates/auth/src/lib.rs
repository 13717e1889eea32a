//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Admin and principal entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, middleware, DTOs, router
//!
//! ## Features
//! - Admin panel sign-in with login id + password
//! - Bearer-token authentication for customers and staff
//! - Role guard for admin-only routes
//! - Admin password reset
//!
//! ## Security Model
//! - Admin passwords hashed with Argon2id (NIST SP 800-63B policy on reset)
//! - Unknown login id and wrong password are indistinguishable to clients
//! - Every request reloads the principal, so deleted accounts lose access
//!   before their token expires

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::entity::principal::Principal;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
