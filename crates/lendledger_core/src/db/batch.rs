//! All-or-nothing grouped writes.
//!
//! # Invariants
//! - Members run in order inside one `BEGIN IMMEDIATE` transaction.
//! - Any member error, or a member that matches no row, drops the transaction
//!   before commit so SQLite rolls every member back.
//! - Callers never see transaction lifecycle; they hand over a slice of writes.

use super::{DbError, DbResult};
use crate::model::loan::Loan;
use log::{debug, warn};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// One member of a grouped ledger write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    /// Sets `assets.is_issued` for one existing asset.
    SetAssetIssued { asset_id: String, issued: bool },
    /// Writes the loan row for `loan.asset_id`, replacing a stale one.
    PutLoan(Loan),
    /// Removes the loan row for one asset. The row must exist.
    DeleteLoan { asset_id: String },
}

impl LedgerWrite {
    fn operation(&self) -> &'static str {
        match self {
            Self::SetAssetIssued { .. } => "set_asset_issued",
            Self::PutLoan(_) => "put_loan",
            Self::DeleteLoan { .. } => "delete_loan",
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::SetAssetIssued { asset_id, .. } => asset_id,
            Self::PutLoan(loan) => &loan.asset_id,
            Self::DeleteLoan { asset_id } => asset_id,
        }
    }
}

/// Applies `writes` atomically: all of them commit, or none do.
///
/// # Errors
/// - `DbError::WriteRejected` when a member targets a missing row.
/// - `DbError::Sqlite` for constraint violations and I/O failures.
pub fn apply_writes(conn: &Connection, writes: &[LedgerWrite]) -> DbResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    for write in writes {
        if let Err(err) = apply_one(&tx, write) {
            warn!(
                "event=ledger_batch module=db status=error operation={} key={} error={}",
                write.operation(),
                write.key(),
                err
            );
            return Err(err);
        }
    }
    tx.commit()?;

    debug!(
        "event=ledger_batch module=db status=ok writes={}",
        writes.len()
    );
    Ok(())
}

fn apply_one(tx: &Transaction<'_>, write: &LedgerWrite) -> DbResult<()> {
    let changed = match write {
        LedgerWrite::SetAssetIssued { asset_id, issued } => tx.execute(
            "UPDATE assets SET is_issued = ?2 WHERE id = ?1;",
            params![asset_id, i64::from(*issued)],
        )?,
        LedgerWrite::PutLoan(loan) => tx.execute(
            "INSERT OR REPLACE INTO loans (asset_id, user_id, issue_date)
             VALUES (?1, ?2, ?3);",
            params![loan.asset_id, loan.user_id, loan.issue_date],
        )?,
        LedgerWrite::DeleteLoan { asset_id } => {
            tx.execute("DELETE FROM loans WHERE asset_id = ?1;", [asset_id])?
        }
    };

    if changed == 0 {
        return Err(DbError::WriteRejected {
            operation: write.operation(),
            key: write.key().to_string(),
        });
    }
    Ok(())
}
