//! Error conversions - rendering [`AppError`] as an HTTP response
//!
//! The storefront and admin panel both branch on a `success` flag, so every
//! failure is rendered as the same JSON envelope:
//!
//! ```json
//! { "success": false, "code": "OTP_COOLDOWN", "message": "Wait 12s before resending", "remaining": 12 }
//! ```

#[cfg(feature = "axum")]
use super::app_error::AppError;

#[cfg(feature = "axum")]
impl AppError {
    /// JSON body for this error
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "success": false,
            "code": self.code(),
            "message": self.message(),
        });
        if let Some(action) = self.action() {
            body["action"] = serde_json::Value::from(action);
        }
        if let Some(secs) = self.retry_after_secs() {
            body["remaining"] = serde_json::Value::from(secs);
        }
        body
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(self.to_body())).into_response();
        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
