//! Ledger domain records.
//!
//! # Responsibility
//! - Define the three persisted records: assets, users and loans.
//! - Own record-level validation shared by every repository write/read path.
//! - Own the loan age and overdue arithmetic.
//!
//! # Invariants
//! - Every record is identified by a caller-chosen string id.
//! - Ids are never reused for a different record; repositories never
//!   overwrite an existing id.

pub mod asset;
pub mod loan;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static RECORD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]{0,63}$").expect("valid record id regex"));

/// Record validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Id is empty, too long, or contains unsupported characters.
    InvalidId { field: &'static str, value: String },
    /// Required text field is empty or whitespace only.
    BlankField(&'static str),
    /// User record carries no credential hash.
    MissingCredential,
    /// Loan issue date must be a positive epoch second.
    NonPositiveIssueDate(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { field, value } => write!(f, "invalid {field}: `{value}`"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::MissingCredential => write!(f, "user credential hash must not be empty"),
            Self::NonPositiveIssueDate(value) => {
                write!(f, "loan issue date must be positive, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `value` is an acceptable record id.
pub fn is_valid_record_id(value: &str) -> bool {
    RECORD_ID_RE.is_match(value)
}

pub(crate) fn validate_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_valid_record_id(value) {
        return Ok(());
    }
    Err(ValidationError::InvalidId {
        field,
        value: value.to_string(),
    })
}

pub(crate) fn validate_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
