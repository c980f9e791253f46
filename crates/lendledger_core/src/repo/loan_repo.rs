//! Loan repository contract and SQLite implementation.
//!
//! Loans are only ever written through `apply`, so every change to the loan
//! collection travels in the same grouped write as the matching asset flag.

use super::{ensure_connection_ready, RepoResult};
use crate::db::{apply_writes, LedgerWrite};
use crate::model::loan::Loan;
use rusqlite::{Connection, Row};

const LOAN_SELECT_SQL: &str = "SELECT
    asset_id,
    user_id,
    issue_date
FROM loans";

const LOAN_COLUMNS: &[&str] = &["asset_id", "user_id", "issue_date"];

/// Repository interface for the loan collection.
pub trait LoanRepository {
    /// Active loan for `asset_id`, if any.
    fn find(&self, asset_id: &str) -> RepoResult<Option<Loan>>;
    /// Full snapshot ordered by asset id.
    fn get_all(&self) -> RepoResult<Vec<Loan>>;
    /// Loans held by `user_id`, ordered by asset id.
    fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Loan>>;
    /// Applies `writes` atomically through the storage engine.
    fn apply(&self, writes: &[LedgerWrite]) -> RepoResult<()>;
}

/// SQLite-backed loan repository.
pub struct SqliteLoanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLoanRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "loans", LOAN_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl LoanRepository for SqliteLoanRepository<'_> {
    fn find(&self, asset_id: &str) -> RepoResult<Option<Loan>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOAN_SELECT_SQL} WHERE asset_id = ?1;"))?;
        let mut rows = stmt.query([asset_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_loan_row(row)?));
        }
        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Loan>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOAN_SELECT_SQL} ORDER BY asset_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut loans = Vec::new();
        while let Some(row) = rows.next()? {
            loans.push(parse_loan_row(row)?);
        }
        Ok(loans)
    }

    fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Loan>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOAN_SELECT_SQL} WHERE user_id = ?1 ORDER BY asset_id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        let mut loans = Vec::new();
        while let Some(row) = rows.next()? {
            loans.push(parse_loan_row(row)?);
        }
        Ok(loans)
    }

    fn apply(&self, writes: &[LedgerWrite]) -> RepoResult<()> {
        for write in writes {
            if let LedgerWrite::PutLoan(loan) = write {
                loan.validate()?;
            }
        }
        apply_writes(self.conn, writes)?;
        Ok(())
    }
}

fn parse_loan_row(row: &Row<'_>) -> RepoResult<Loan> {
    let loan = Loan {
        asset_id: row.get("asset_id")?,
        user_id: row.get("user_id")?,
        issue_date: row.get("issue_date")?,
    };
    loan.validate()?;
    Ok(loan)
}
