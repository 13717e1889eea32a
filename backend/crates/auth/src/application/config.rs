//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::secret::{HashCost, SecretHashError};

/// Auth application configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id cost for new admin password hashes
    pub hash_cost: HashCost,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), SecretHashError> {
        self.hash_cost.validate()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert!(config.pepper().is_none());
        assert_eq!(config.hash_cost, HashCost::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let config = AuthConfig {
            hash_cost: HashCost {
                memory_kib: 1,
                iterations: 0,
                parallelism: 1,
            },
            ..AuthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
