//! Lendable asset record.
//!
//! # Invariants
//! - `issued == true` iff a loan row exists for `id`. Only the loan service
//!   flips the flag, and always together with the loan row.
//! - Assets are never deleted.

use super::{validate_id, validate_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Kind of lendable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Book,
    Laptop,
    /// Persisted kind not covered by the variants above.
    Unknown,
}

impl AssetType {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Laptop => "laptop",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a storage string. Returns `None` for values outside the schema.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "book" => Some(Self::Book),
            "laptop" => Some(Self::Laptop),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// One lendable item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    /// Serialized as `type` to match the persisted column name.
    #[serde(rename = "type")]
    pub kind: AssetType,
    pub title: String,
    /// Author for books, owner/info for laptops.
    pub author_or_owner: String,
    pub issued: bool,
}

impl Asset {
    /// Creates an available (not issued) asset.
    pub fn new(
        id: impl Into<String>,
        kind: AssetType,
        title: impl Into<String>,
        author_or_owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            author_or_owner: author_or_owner.into(),
            issued: false,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.issued
    }

    /// Validates record fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("asset id", &self.id)?;
        validate_not_blank("asset title", &self.title)?;
        validate_not_blank("asset author/owner", &self.author_or_owner)?;
        Ok(())
    }
}
