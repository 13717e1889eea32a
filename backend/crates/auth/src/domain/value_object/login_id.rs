//! Login ID Value Object
//!
//! The identifier an operator types into the admin panel. Stored and
//! compared in lower case.

use std::fmt;

/// Maximum login id length
const LOGIN_ID_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginId(String);

impl LoginId {
    /// Normalize a submitted login id
    ///
    /// Returns `None` for blank or oversized input; callers treat that the
    /// same as an unknown id.
    pub fn parse(raw: &str) -> Option<Self> {
        let id = raw.trim().to_lowercase();

        if id.is_empty() || id.chars().count() > LOGIN_ID_MAX_LENGTH {
            return None;
        }

        Some(Self(id))
    }

    /// Create from database value (assumed already normalized)
    pub fn from_db(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
