//! Signed Credential Tokens
//!
//! Compact HS256 JWTs carrying `sub`, `role`, `iss`, `iat` and `exp`.
//! Base64url without padding, signature checked with `Mac::verify_slice`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};

/// Minimum signing key length in bytes (256 bits for HS256)
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Default issuer claim
pub const DEFAULT_ISSUER: &str = "food-del";

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest accepted token lifetime (366 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Signing key must be at least {min} bytes of non-repeating material")]
    WeakKey { min: usize },

    #[error("Token TTL must be between 1 and {max} seconds")]
    InvalidTtl { max: i64 },

    #[error("Malformed token")]
    Malformed,

    #[error("Unsupported token header")]
    UnsupportedHeader,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token issuer mismatch")]
    WrongIssuer,

    #[error("Token expired")]
    Expired,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// Signing Key
// ============================================================================

/// HMAC key material, zeroized on drop
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = Zeroizing::new(bytes.into());

        if bytes.len() < MIN_SIGNING_KEY_LEN {
            return Err(TokenError::WeakKey {
                min: MIN_SIGNING_KEY_LEN,
            });
        }
        if bytes.iter().all(|&b| b == bytes[0]) {
            return Err(TokenError::WeakKey {
                min: MIN_SIGNING_KEY_LEN,
            });
        }

        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Claims
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Signer
// ============================================================================

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub key: SigningKey,
    pub issuer: String,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            issuer: DEFAULT_ISSUER.to_string(),
            ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Result<Self, TokenError> {
        if ttl <= Duration::zero() || ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(TokenError::InvalidTtl {
                max: MAX_TOKEN_TTL_SECS,
            });
        }
        self.ttl = ttl;
        Ok(self)
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct TokenSigner {
    config: TokenConfig,
}

impl TokenSigner {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Sign a token for `subject` with `role`, valid from `issued_at`
    pub fn sign(
        &self,
        subject: Uuid,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.config.ttl)
            .ok_or_else(|| TokenError::Encoding("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: subject,
            role: role.to_string(),
            iss: self.config.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let header = Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let header_json =
            serde_json::to_vec(&header).map_err(|e| TokenError::Encoding(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| TokenError::Encoding(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            to_base64url(&header_json),
            to_base64url(&claims_json)
        );
        let signature = hmac_sha256(self.config.key.as_bytes(), signing_input.as_bytes());

        Ok(IssuedToken {
            token: format!("{signing_input}.{}", to_base64url(&signature)),
            expires_at,
        })
    }

    /// Verify signature, issuer and expiry, returning the claims
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut parts = token.trim().split('.');
        let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header_raw = from_base64url(header_b64).map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_raw).map_err(|_| TokenError::Malformed)?;
        if header.alg != "HS256" || !header.typ.eq_ignore_ascii_case("JWT") {
            return Err(TokenError::UnsupportedHeader);
        }

        let signature = from_base64url(sig_b64).map_err(|_| TokenError::Malformed)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        if !verify_hmac_sha256(
            self.config.key.as_bytes(),
            signing_input.as_bytes(),
            &signature,
        ) {
            return Err(TokenError::BadSignature);
        }

        let claims_raw = from_base64url(claims_b64).map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&claims_raw).map_err(|_| TokenError::Malformed)?;

        if claims.iss != self.config.issuer {
            return Err(TokenError::WrongIssuer);
        }
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
