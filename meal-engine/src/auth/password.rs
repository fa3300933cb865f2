//! Password hashing
//!
//! The engine only needs a salted one-way function; [`CredentialHasher`] is
//! the seam and [`Argon2Hasher`] the default implementation.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use shared::error::{AppError, AppResult, ErrorCode};

/// Pluggable one-way credential function
pub trait CredentialHasher: Send + Sync + std::fmt::Debug {
    /// Produce a self-describing hash (salt and parameters included)
    fn hash(&self, password: &str) -> AppResult<String>;

    /// Check a password against a stored hash; malformed hashes never match
    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Run a verification that cannot succeed, costing the same as a real one
    fn verify_dummy(&self, password: &str);
}

/// Argon2id hasher producing PHC strings
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
    dummy_hash: String,
}

impl Argon2Hasher {
    /// Hasher with the argon2 crate's default cost
    pub fn new() -> AppResult<Self> {
        Self::from_params(Params::default())
    }

    /// Hasher with explicit cost: memory in KiB, iterations, parallelism
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> AppResult<Self> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|e| {
            AppError::with_message(ErrorCode::ConfigError, format!("Invalid argon2 params: {e}"))
        })?;
        Self::from_params(params)
    }

    fn from_params(params: Params) -> AppResult<Self> {
        let mut hasher = Self {
            params,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash("not-a-real-password")?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password123"));
        assert!(hasher.verify("password123", &hash));
        assert!(!hasher.verify("password124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = hasher();
        assert!(!hasher.verify("password123", "password123"));
        assert!(!hasher.verify("", ""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = Argon2Hasher::with_params(0, 0, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
