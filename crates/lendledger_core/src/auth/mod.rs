//! Credential capability consumed by account flows.
//!
//! The ledger never inspects a credential hash. It stores whatever
//! `CredentialVerifier::hash` returns and hands it back to `verify`.

mod password;

pub use password::Argon2CredentialVerifier;

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Plaintext rejected before hashing.
    EmptyPassword,
    /// Hashing backend failed.
    Hash(String),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::Hash(message) => write!(f, "failed to hash password: {message}"),
        }
    }
}

impl Error for CredentialError {}

/// Opaque password hashing capability.
pub trait CredentialVerifier {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError>;
    /// Returns `false` for a wrong password and for an unreadable hash.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}
