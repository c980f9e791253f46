//! Ledger user record.
//!
//! Role and credential are mandatory for every user. The role is fixed once
//! the record is stored.

use super::{validate_id, validate_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Patron who borrows assets.
    User,
    /// Operator who manages the catalog and loans.
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Staff => "staff",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Opaque output of a `CredentialVerifier`. Never serialized.
    #[serde(skip_serializing, default)]
    pub credential_hash: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        credential_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            credential_hash: credential_hash.into(),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("user id", &self.id)?;
        validate_not_blank("user name", &self.name)?;
        if self.credential_hash.is_empty() {
            return Err(ValidationError::MissingCredential);
        }
        Ok(())
    }
}
