//! Password hashing capability
//!
//! The core has no interest in the hashing algorithm; the auth
//! collaborator depends on this capability interface and production
//! code plugs in bcrypt.

use crate::error::{AppError, Result};

/// Capability interface for credential hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a secret into a storable digest
    fn hash(&self, secret: &str) -> Result<String>;

    /// Check a secret against a stored digest
    fn verify(&self, secret: &str, digest: &str) -> Result<bool>;
}

/// Production hasher backed by bcrypt
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> Result<String> {
        bcrypt::hash(secret, self.cost).map_err(|e| {
            AppError::InternalError {
                message: format!("Password hashing failed: {}", e),
            }
            .into()
        })
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool> {
        bcrypt::verify(secret, digest).map_err(|e| {
            AppError::InternalError {
                message: format!("Password verification failed: {}", e),
            }
            .into()
        })
    }
}

/// Pass-through hasher for tests; never use in production
#[derive(Debug, Clone, Default)]
pub struct PlaintextHasher;

impl PasswordHasher for PlaintextHasher {
    fn hash(&self, secret: &str) -> Result<String> {
        Ok(secret.to_string())
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool> {
        Ok(secret == digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_round_trip() {
        // Minimum cost keeps the test fast.
        let hasher = BcryptHasher::new(4);
        let digest = hasher.hash("secreto").unwrap();

        assert_ne!(digest, "secreto");
        assert!(hasher.verify("secreto", &digest).unwrap());
        assert!(!hasher.verify("otra-clave", &digest).unwrap());
    }

    #[test]
    fn test_plaintext_hasher_round_trip() {
        let hasher = PlaintextHasher;
        let digest = hasher.hash("secreto").unwrap();
        assert!(hasher.verify("secreto", &digest).unwrap());
        assert!(!hasher.verify("otra", &digest).unwrap());
    }
}
