//! Infrastructure Layer - Persistence and outbound SMS

pub mod postgres;
pub mod sms;
