//! Outbound code delivery port

use crate::domain::value_objects::{OtpCode, PhoneNumber};

/// Delivers a plaintext code to a phone number
///
/// Reports success or failure only. Implementations log their own failures
/// and never retry.
#[trait_variant::make(SmsDispatcher: Send)]
pub trait LocalSmsDispatcher {
    async fn send_code(&self, phone: &PhoneNumber, code: &OtpCode) -> bool;
}
