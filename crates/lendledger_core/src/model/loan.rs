//! Active loan record and loan age rules.
//!
//! # Invariants
//! - At most one loan per asset; the asset id is the key.
//! - `issue_date` is a positive Unix epoch second.
//! - Loan age and overdue status are computed here and nowhere else.

use super::{validate_id, ValidationError};
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_DAY: i64 = 86_400;
/// A loan strictly older than this many days is overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 14;

/// Current possession of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub asset_id: String,
    pub user_id: String,
    /// Unix epoch seconds.
    pub issue_date: i64,
}

impl Loan {
    pub fn new(asset_id: impl Into<String>, user_id: impl Into<String>, issue_date: i64) -> Self {
        Self {
            asset_id: asset_id.into(),
            user_id: user_id.into(),
            issue_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id("asset id", &self.asset_id)?;
        validate_id("user id", &self.user_id)?;
        if self.issue_date <= 0 {
            return Err(ValidationError::NonPositiveIssueDate(self.issue_date));
        }
        Ok(())
    }

    /// Seconds held as of `now`. Clamped to zero when `now` precedes the issue.
    pub fn elapsed_secs(&self, now: i64) -> i64 {
        now.saturating_sub(self.issue_date).max(0)
    }

    /// Whole days held as of `now`.
    pub fn age_days(&self, now: i64) -> i64 {
        self.elapsed_secs(now) / SECONDS_PER_DAY
    }

    pub fn is_overdue(&self, now: i64) -> bool {
        self.elapsed_secs(now) > OVERDUE_AFTER_DAYS * SECONDS_PER_DAY
    }
}
