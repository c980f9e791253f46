//! SQLite storage engine for the lending ledger.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the ledger.
//! - Apply schema migrations in deterministic order.
//! - Provide the all-or-nothing grouped write used by loan transitions.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write ledger data before migrations succeed.
//! - A grouped write either commits every member or none of them.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod batch;
pub mod migrations;
mod open;

pub use batch::{apply_writes, LedgerWrite};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A grouped write member matched no row; the whole batch was rolled back.
    WriteRejected {
        operation: &'static str,
        key: String,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::WriteRejected { operation, key } => {
                write!(f, "grouped write `{operation}` matched no row for `{key}`")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::WriteRejected { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
