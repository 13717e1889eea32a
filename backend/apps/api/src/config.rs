//! Server configuration from environment variables
//!
//! Every variable is read once at boot. A variable that is present but
//! unparseable stops the server instead of falling back to a default.

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use auth::AuthConfig;
use otp::OtpConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 4000;

/// Storefront and admin panel dev servers
const DEFAULT_FRONTEND_URLS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5174",
];

pub struct ApiConfig {
    pub database_url: String,
    pub jwt_secret: String,
    /// `None` keeps the signer's default lifetime
    pub token_ttl: Option<chrono::Duration>,
    pub otp: OtpConfig,
    pub auth: AuthConfig,
    pub sms_api_key: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_urls: Vec<String>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;

        let token_ttl = parse::<i64>(&get, "TOKEN_TTL_SECONDS")?
            .map(|secs| {
                if secs <= 0 {
                    bail!("TOKEN_TTL_SECONDS must be positive");
                }
                chrono::Duration::try_seconds(secs).context("TOKEN_TTL_SECONDS is out of range")
            })
            .transpose()?;

        let defaults = OtpConfig::default();
        let otp = OtpConfig {
            code_length: parse(&get, "OTP_LENGTH")?.unwrap_or(defaults.code_length),
            ttl: parse_secs(&get, "OTP_TTL_SECONDS")?.unwrap_or(defaults.ttl),
            resend_cooldown: parse_secs(&get, "OTP_RESEND_SECONDS")?
                .unwrap_or(defaults.resend_cooldown),
            max_attempts: parse(&get, "OTP_MAX_ATTEMPTS")?.unwrap_or(defaults.max_attempts),
            hash_cost: defaults.hash_cost,
        };
        otp.validate().context("Invalid OTP configuration")?;

        let auth = AuthConfig {
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            ..AuthConfig::default()
        };
        auth.validate().context("Invalid auth configuration")?;

        let host = parse(&get, "HOST")?.unwrap_or(DEFAULT_HOST);
        let port = parse(&get, "PORT")?.unwrap_or(DEFAULT_PORT);

        let frontend_urls = match get("FRONTEND_URLS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_FRONTEND_URLS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            token_ttl,
            otp,
            auth,
            sms_api_key: get("SMS_API_KEY"),
            host,
            port,
            frontend_urls,
        })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow!("{key} has invalid value {raw:?}: {e}"))
        })
        .transpose()
}

fn parse_secs(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Duration>> {
    Ok(parse::<u64>(get, key)?.map(Duration::from_secs))
}
