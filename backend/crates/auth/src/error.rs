//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::secret::PasswordPolicyError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login id or password missing from the request
    #[error("ID and password required")]
    MissingCredentials,

    /// Unknown login id or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No token, or a token that fails verification
    #[error("Not Authorized Login Again")]
    Unauthenticated,

    /// Token is valid but its subject no longer exists
    #[error("User not found")]
    PrincipalNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Admin not found")]
    AdminNotFound,

    /// Phone number or new password missing from a reset request
    #[error("Phone number and new password required")]
    MalformedResetRequest,

    /// New password rejected by the policy
    #[error("{0}")]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Credential could not be signed
    #[error("Signing error: {0}")]
    Signing(#[from] TokenError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials
            | AuthError::MalformedResetRequest
            | AuthError::PasswordPolicy(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::PrincipalNotFound => ErrorKind::Unauthorized,
            AuthError::InsufficientPermissions => ErrorKind::Forbidden,
            AuthError::AdminNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Signing(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "AUTH_MISSING_CREDENTIALS",
            AuthError::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            AuthError::Unauthenticated => "AUTH_UNAUTHENTICATED",
            AuthError::PrincipalNotFound => "AUTH_PRINCIPAL_NOT_FOUND",
            AuthError::InsufficientPermissions => "AUTH_INSUFFICIENT_PERMISSIONS",
            AuthError::AdminNotFound => "AUTH_ADMIN_NOT_FOUND",
            AuthError::MalformedResetRequest => "AUTH_MALFORMED_REQUEST",
            AuthError::PasswordPolicy(_) => "AUTH_WEAK_PASSWORD",
            AuthError::Database(_) => "AUTH_STORAGE_FAILURE",
            AuthError::Signing(_) => "AUTH_SIGNING_FAILURE",
            AuthError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Signing(e) => {
                tracing::error!(error = %e, "Auth credential signing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InsufficientPermissions => {
                tracing::warn!("Request rejected by role guard");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        let code = err.code();

        let app = if kind.is_server_error() {
            AppError::new(kind, "Something went wrong. Please try again.")
        } else {
            AppError::new(kind, err.to_string())
        };
        let app = app.with_code(code);

        match err {
            AuthError::Unauthenticated | AuthError::PrincipalNotFound => {
                app.with_action("Sign in again")
            }
            AuthError::Database(e) => app.with_source(e),
            AuthError::Signing(e) => app.with_source(e),
            _ => app,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AuthError::MissingCredentials, StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::PrincipalNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::InsufficientPermissions, StatusCode::FORBIDDEN),
            (AuthError::AdminNotFound, StatusCode::NOT_FOUND),
            (
                AuthError::PasswordPolicy(PasswordPolicyError::CommonPattern),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error:?}");
        }
    }

    #[test]
    fn test_policy_message_reaches_client() {
        let app = AppError::from(AuthError::PasswordPolicy(PasswordPolicyError::TooShort {
            min: 8,
            actual: 3,
        }));
        assert_eq!(app.message(), "Password must be at least 8 characters (got 3)");
        assert_eq!(app.code(), "AUTH_WEAK_PASSWORD");
    }

    #[test]
    fn test_signing_failure_is_generic() {
        let app = AppError::from(AuthError::Signing(TokenError::WeakKey { min: 32 }));
        assert!(!app.message().contains("key"));
        assert!(app.is_server_error());
    }
}
