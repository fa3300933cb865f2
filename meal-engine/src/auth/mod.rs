//! Authentication primitives
//!
//! Credential hashing behind the [`CredentialHasher`] trait.

pub mod password;

pub use password::{Argon2Hasher, CredentialHasher};
