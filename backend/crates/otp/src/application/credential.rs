//! Credential Issuer seam
//!
//! The verifier only needs "turn this customer into a token". Signing is
//! process-wide configuration owned by the binary.

use chrono::{DateTime, Utc};
use kernel::id::CustomerId;
use kernel::role::Role;
use platform::token::{TokenError, TokenSigner};

pub trait CredentialIssuer: Send + Sync {
    /// Mint a signed token asserting `customer_id`
    fn issue(&self, customer_id: CustomerId, issued_at: DateTime<Utc>) -> Result<String, TokenError>;
}

impl CredentialIssuer for TokenSigner {
    fn issue(&self, customer_id: CustomerId, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        self.sign(customer_id.into_uuid(), Role::Customer.code(), issued_at)
            .map(|issued| issued.token)
    }
}
