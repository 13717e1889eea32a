//! OTP Error Types
//!
//! OTP-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Messages are the ones the storefront
//! shows verbatim; none of them carries a code, a hash or a key.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;
use thiserror::Error;

/// OTP-specific result type alias
pub type OtpResult<T> = Result<T, OtpError>;

#[derive(Debug, Error)]
pub enum OtpError {
    /// Phone number is not E.164
    #[error("Phone must be E.164 like +91XXXXXXXXXX")]
    InvalidSubject,

    /// A code was sent less than one cooldown window ago
    #[error("Wait {remaining_secs}s before resending")]
    Cooldown { remaining_secs: u64 },

    /// The SMS gateway refused or could not be reached
    #[error("Failed to send OTP")]
    DispatchFailed,

    /// No code has been requested, or it was already used
    #[error("Request a new OTP")]
    NoActiveChallenge,

    #[error("OTP expired")]
    Expired,

    /// Attempt budget spent for the current code
    #[error("Too many attempts. Request a new OTP.")]
    TooManyAttempts,

    #[error("Invalid OTP")]
    InvalidCode { attempts_remaining: u32 },

    /// Request body is missing the phone number or the code
    #[error("Phone and OTP required")]
    MalformedRequest,

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Credential could not be signed
    #[error("Signing error: {0}")]
    Signing(#[from] TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OtpError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OtpError::InvalidSubject | OtpError::MalformedRequest => ErrorKind::BadRequest,
            OtpError::Cooldown { .. } | OtpError::TooManyAttempts => ErrorKind::TooManyRequests,
            OtpError::DispatchFailed => ErrorKind::BadGateway,
            OtpError::NoActiveChallenge | OtpError::Expired => ErrorKind::Gone,
            OtpError::InvalidCode { .. } => ErrorKind::Unauthorized,
            OtpError::Database(_) | OtpError::Signing(_) | OtpError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::InvalidSubject => "OTP_INVALID_PHONE",
            OtpError::Cooldown { .. } => "OTP_COOLDOWN",
            OtpError::DispatchFailed => "OTP_DISPATCH_FAILED",
            OtpError::NoActiveChallenge => "OTP_NOT_REQUESTED",
            OtpError::Expired => "OTP_EXPIRED",
            OtpError::TooManyAttempts => "OTP_TOO_MANY_ATTEMPTS",
            OtpError::InvalidCode { .. } => "OTP_INVALID_CODE",
            OtpError::MalformedRequest => "OTP_MALFORMED_REQUEST",
            OtpError::Database(_) => "OTP_STORAGE_FAILURE",
            OtpError::Signing(_) => "OTP_SIGNING_FAILURE",
            OtpError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            OtpError::Database(e) => {
                tracing::error!(error = %e, "OTP database error");
            }
            OtpError::Signing(e) => {
                tracing::error!(error = %e, "OTP credential signing failed");
            }
            OtpError::Internal(msg) => {
                tracing::error!(message = %msg, "OTP internal error");
            }
            OtpError::DispatchFailed => {
                tracing::warn!("OTP dispatch failed");
            }
            OtpError::Cooldown { remaining_secs } => {
                tracing::warn!(remaining_secs = *remaining_secs, "OTP resend during cooldown");
            }
            OtpError::TooManyAttempts => {
                tracing::warn!("OTP attempts exhausted");
            }
            OtpError::InvalidCode { attempts_remaining } => {
                tracing::warn!(attempts_remaining = *attempts_remaining, "OTP invalid code");
            }
            _ => {
                tracing::debug!(error = %self, "OTP error");
            }
        }
    }
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        let kind = err.kind();
        let code = err.code();

        let app = if kind.is_server_error() {
            // Underlying error stays in the logs only
            AppError::new(kind, "Something went wrong. Please try again.")
        } else {
            AppError::new(kind, err.to_string())
        };
        let app = app.with_code(code);

        match err {
            OtpError::Cooldown { remaining_secs } => app.with_retry_after(remaining_secs),
            OtpError::Expired | OtpError::TooManyAttempts => app.with_action("Request a new OTP"),
            OtpError::DispatchFailed => app.with_action("Try again in a moment"),
            OtpError::Database(e) => app.with_source(e),
            OtpError::Signing(e) => app.with_source(e),
            _ => app,
        }
    }
}

impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
