//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG codes, HMAC-SHA256, Base64url)
//! - Salted secret hashing (Argon2id) for OTP codes and admin passwords
//! - Signed credential tokens (HS256)
//! - Bearer token and client address extraction from request headers

pub mod bearer;
pub mod client;
pub mod crypto;
pub mod secret;
pub mod token;
