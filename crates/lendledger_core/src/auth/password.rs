//! Argon2id credential hashing.

use super::{CredentialError, CredentialVerifier};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use log::warn;
use rand::rngs::OsRng;

/// Stores credentials as Argon2id PHC strings with a random salt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialVerifier;

impl Argon2CredentialVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialVerifier for Argon2CredentialVerifier {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        if plaintext.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialError::Hash(err.to_string()))
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("event=credential_verify module=auth status=error error_code=unreadable_hash error={err}");
                return false;
            }
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Argon2CredentialVerifier;
    use crate::auth::{CredentialError, CredentialVerifier};

    #[test]
    fn hash_and_verify_round_trip() {
        let verifier = Argon2CredentialVerifier::new();
        let hash = verifier.hash("test123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.verify(&hash, "test123"));
        assert!(!verifier.verify(&hash, "wrongpw"));
    }

    #[test]
    fn hashes_are_salted() {
        let verifier = Argon2CredentialVerifier::new();
        let first = verifier.hash("same").unwrap();
        let second = verifier.hash("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = Argon2CredentialVerifier::new().hash("").unwrap_err();
        assert_eq!(err, CredentialError::EmptyPassword);
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!Argon2CredentialVerifier::new().verify("not-a-phc-string", "pw"));
    }
}
