//! SMS dispatchers
//!
//! `TwoFactorSms` talks to the 2Factor transactional SMS API. `ConsoleSms`
//! only logs, for local development without gateway credentials.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::dispatcher::SmsDispatcher;
use crate::domain::value_objects::{OtpCode, PhoneNumber};

pub const TWO_FACTOR_BASE_URL: &str = "https://2factor.in/API/V1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Code lengths the gateway's OTP template accepts
const GATEWAY_CODE_LENGTHS: std::ops::RangeInclusive<usize> = 4..=6;

#[derive(Debug, Deserialize)]
struct TwoFactorResponse {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Details", default)]
    details: serde_json::Value,
}

impl TwoFactorResponse {
    fn is_success(&self) -> bool {
        self.status == "Success"
    }
}

/// 2Factor SMS gateway client
#[derive(Clone)]
pub struct TwoFactorSms {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TwoFactorSms {
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: TWO_FACTOR_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn send_url(&self, phone: &PhoneNumber, code: &OtpCode) -> String {
        format!(
            "{}/{}/SMS/{}/{}",
            self.base_url,
            self.api_key,
            phone.digits(),
            code.as_str()
        )
    }
}

impl std::fmt::Debug for TwoFactorSms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoFactorSms")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SmsDispatcher for TwoFactorSms {
    async fn send_code(&self, phone: &PhoneNumber, code: &OtpCode) -> bool {
        if !GATEWAY_CODE_LENGTHS.contains(&code.as_str().len()) {
            tracing::error!(
                length = code.as_str().len(),
                "OTP length not accepted by SMS gateway"
            );
            return false;
        }

        // The URL embeds the API key and the code; keep it out of logs
        let response = match self.client.get(self.send_url(phone, code)).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e.without_url(), "SMS gateway unreachable");
                return false;
            }
        };

        let status = response.status();
        let body = match response.json::<TwoFactorResponse>().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(http_status = %status, error = %e.without_url(), "Unreadable SMS gateway response");
                return false;
            }
        };

        if !body.is_success() {
            tracing::warn!(
                http_status = %status,
                gateway_status = %body.status,
                details = %body.details,
                "SMS gateway rejected OTP"
            );
            return false;
        }

        tracing::debug!(phone = %phone, "OTP handed to SMS gateway");
        true
    }
}

/// Development dispatcher: logs the code instead of sending it
#[derive(Debug, Clone, Default)]
pub struct ConsoleSms;

impl SmsDispatcher for ConsoleSms {
    async fn send_code(&self, phone: &PhoneNumber, code: &OtpCode) -> bool {
        tracing::warn!(phone = %phone, code = code.as_str(), "SMS not configured, OTP logged locally");
        true
    }
}

/// Dispatcher selected at boot
#[derive(Debug, Clone)]
pub enum SmsGateway {
    TwoFactor(TwoFactorSms),
    Console(ConsoleSms),
}

impl SmsDispatcher for SmsGateway {
    async fn send_code(&self, phone: &PhoneNumber, code: &OtpCode) -> bool {
        match self {
            SmsGateway::TwoFactor(sms) => sms.send_code(phone, code).await,
            SmsGateway::Console(sms) => sms.send_code(phone, code).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_url_uses_digits_only() {
        let sms = TwoFactorSms::new("key-123").unwrap();
        let phone = PhoneNumber::parse("+919876543210").unwrap();
        let code = OtpCode::from_submitted("042317").unwrap();

        assert_eq!(
            sms.send_url(&phone, &code),
            "https://2factor.in/API/V1/key-123/SMS/919876543210/042317"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let sms = TwoFactorSms::new("k")
            .unwrap()
            .with_base_url("http://localhost:9999/mock/");
        let phone = PhoneNumber::parse("+14155550123").unwrap();
        let code = OtpCode::from_submitted("1234").unwrap();

        assert_eq!(
            sms.send_url(&phone, &code),
            "http://localhost:9999/mock/k/SMS/14155550123/1234"
        );
    }

    #[test]
    fn test_gateway_response_status() {
        let ok: TwoFactorResponse =
            serde_json::from_str(r#"{"Status":"Success","Details":"a1b2c3"}"#).unwrap();
        assert!(ok.is_success());

        let err: TwoFactorResponse =
            serde_json::from_str(r#"{"Status":"Error","Details":"Invalid API Key"}"#).unwrap();
        assert!(!err.is_success());

        let bare: TwoFactorResponse = serde_json::from_str(r#"{"Status":"success"}"#).unwrap();
        assert!(!bare.is_success());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let sms = TwoFactorSms::new("super-secret-key").unwrap();
        assert!(!format!("{:?}", sms).contains("super-secret-key"));
    }

    #[tokio::test]
    async fn test_rejects_code_length_gateway_cannot_send() {
        // Rejected before any network I/O
        let sms = TwoFactorSms::new("k").unwrap().with_base_url("http://127.0.0.1:9");
        let phone = PhoneNumber::parse("+14155550123").unwrap();
        let code = OtpCode::from_submitted("123456789").unwrap();

        assert!(!sms.send_code(&phone, &code).await);
    }

    #[tokio::test]
    async fn test_console_always_succeeds() {
        let phone = PhoneNumber::parse("+14155550123").unwrap();
        let code = OtpCode::generate(6);
        assert!(ConsoleSms.send_code(&phone, &code).await);
        assert!(
            SmsGateway::Console(ConsoleSms)
                .send_code(&phone, &code)
                .await
        );
    }
}
