//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (OtpState, IssuedChallenge)
//! - Domain value objects (PhoneNumber, OtpCode)
//! - Domain services (resend cooldown arithmetic)
//! - Ports (challenge repository, SMS dispatcher)

pub mod dispatcher;
pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
