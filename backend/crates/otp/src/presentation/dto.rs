//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

/// Request for POST /api/sms/request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Response for POST /api/sms/request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpResponse {
    pub success: bool,
    pub message: &'static str,
    pub cooldown_seconds: u64,
}

/// The storefront posts the code as text; some clients send a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmittedCode {
    Text(String),
    Number(u64),
}

impl SubmittedCode {
    pub fn into_string(self) -> String {
        match self {
            SubmittedCode::Text(s) => s,
            SubmittedCode::Number(n) => n.to_string(),
        }
    }
}

/// Request for POST /api/sms/verify
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub otp: Option<SubmittedCode>,
}

/// Response for POST /api/sms/verify
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub token: String,
}
