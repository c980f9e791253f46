//! Account registration and authentication.
//!
//! # Invariants
//! - Plaintext passwords never reach storage; only `CredentialVerifier`
//!   output does.
//! - Registration never overwrites an existing user.
//! - The first account of an empty ledger can be created as staff; later
//!   staff bootstrap attempts are no-ops.

use crate::auth::{CredentialError, CredentialVerifier};
use crate::model::user::{Role, User};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AccountError {
    DuplicateUser(String),
    UserNotFound(String),
    InvalidCredentials(String),
    Credential(CredentialError),
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUser(id) => write!(f, "user already exists: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::InvalidCredentials(id) => write!(f, "invalid credentials for user: {id}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Credential(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CredentialError> for AccountError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Account flows over the user repository and a credential capability.
pub struct AccountService<'r> {
    users: &'r dyn UserRepository,
    credentials: &'r dyn CredentialVerifier,
}

impl<'r> AccountService<'r> {
    pub fn new(users: &'r dyn UserRepository, credentials: &'r dyn CredentialVerifier) -> Self {
        Self { users, credentials }
    }

    /// Registers a patron account.
    pub fn register(&self, id: &str, name: &str, password: &str) -> Result<User, AccountError> {
        self.create(id, name, Role::User, password)
    }

    /// Creates a staff account.
    ///
    /// Intended for staff-only flows; callers check the acting user's role.
    pub fn add_staff(&self, id: &str, name: &str, password: &str) -> Result<User, AccountError> {
        self.create(id, name, Role::Staff, password)
    }

    /// Creates the initial staff account when the ledger has no users.
    ///
    /// Returns `None` without touching storage when any user exists.
    pub fn bootstrap_staff(
        &self,
        id: &str,
        name: &str,
        password: &str,
    ) -> Result<Option<User>, AccountError> {
        if !self.users.get_all()?.is_empty() {
            return Ok(None);
        }
        let user = self.create(id, name, Role::Staff, password)?;
        info!("event=staff_bootstrap module=service status=ok user_id={}", user.id);
        Ok(Some(user))
    }

    /// Checks `password` against the stored credential of `id`.
    pub fn authenticate(&self, id: &str, password: &str) -> Result<User, AccountError> {
        let user = self
            .users
            .find(id)?
            .ok_or_else(|| AccountError::UserNotFound(id.to_string()))?;
        if !self.credentials.verify(&user.credential_hash, password) {
            info!("event=user_login module=service status=rejected error_code=invalid_credentials user_id={id}");
            return Err(AccountError::InvalidCredentials(id.to_string()));
        }
        info!(
            "event=user_login module=service status=ok user_id={} role={}",
            user.id,
            user.role.as_str()
        );
        Ok(user)
    }

    fn create(
        &self,
        id: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> Result<User, AccountError> {
        if self.users.find(id)?.is_some() {
            return Err(AccountError::DuplicateUser(id.to_string()));
        }
        let hash = self.credentials.hash(password)?;
        let user = User::new(id, name, role, hash);
        if !self.users.add(&user)? {
            return Err(AccountError::DuplicateUser(id.to_string()));
        }
        info!(
            "event=user_register module=service status=ok user_id={} role={}",
            user.id,
            role.as_str()
        );
        Ok(user)
    }
}
