//! Principal roles carried in credential tokens

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Storefront customer, signed in by OTP
    Customer,
    /// Admin panel operator
    Admin,
    Developer,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Customer => "customer",
            Admin => "admin",
            Developer => "developer",
        }
    }

    /// Parse a role code, `None` when unknown
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "customer" => Some(Customer),
            "admin" => Some(Admin),
            "developer" => Some(Developer),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Developer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
