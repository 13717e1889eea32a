//! Shared Kernel - Domain-crossing minimal core
//!
//! The vocabulary every backend crate agrees on:
//! - The unified error type rendered to storefront and admin clients
//! - Typed IDs for the subjects that can hold a credential
//! - The roles a credential can assert
//!
//! Only things that are hard to change and mean the same thing in every
//! domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod role;
