//! Loan lifecycle service.
//!
//! # Responsibility
//! - Move assets between `Available` and `Issued`.
//! - Answer loan age and overdue queries from one shared rule set.
//!
//! # Invariants
//! - Every precondition is checked before any write.
//! - Each transition is one grouped write: asset flag and loan row change
//!   together or not at all.
//! - All rows of one listing/overdue scan share a single `now`.
//!
//! # See also
//! - `model::loan` for the age and overdue arithmetic.

use crate::clock::{Clock, SystemClock};
use crate::db::LedgerWrite;
use crate::model::asset::Asset;
use crate::model::loan::Loan;
use crate::repo::asset_repo::AssetRepository;
use crate::repo::loan_repo::LoanRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of an issue/return transition.
#[derive(Debug)]
pub enum LoanError {
    AssetNotFound(String),
    UserNotFound(String),
    /// Asset already has an active loan.
    AlreadyIssued(String),
    /// Asset has no active loan to return.
    NotIssued(String),
    /// Storage failed; the transition was rolled back and nothing changed.
    StorageFailure(RepoError),
}

/// Coarse classification of `LoanError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanErrorKind {
    NotFound,
    Conflict,
    Storage,
}

impl LoanError {
    pub fn kind(&self) -> LoanErrorKind {
        match self {
            Self::AssetNotFound(_) | Self::UserNotFound(_) => LoanErrorKind::NotFound,
            Self::AlreadyIssued(_) | Self::NotIssued(_) => LoanErrorKind::Conflict,
            Self::StorageFailure(_) => LoanErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::AssetNotFound(_) => "asset_not_found",
            Self::UserNotFound(_) => "user_not_found",
            Self::AlreadyIssued(_) => "already_issued",
            Self::NotIssued(_) => "not_issued",
            Self::StorageFailure(_) => "storage_failure",
        }
    }
}

impl Display for LoanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetNotFound(id) => write!(f, "asset not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::AlreadyIssued(id) => write!(f, "asset already issued: {id}"),
            Self::NotIssued(id) => write!(f, "asset not currently issued: {id}"),
            Self::StorageFailure(err) => write!(f, "loan storage failure: {err}"),
        }
    }
}

impl Error for LoanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LoanError {
    fn from(value: RepoError) -> Self {
        Self::StorageFailure(value)
    }
}

/// Loan details attached to an issued asset in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanStatus {
    pub user_id: String,
    /// `None` when the borrower record cannot be found.
    pub borrower_name: Option<String>,
    pub issue_date: i64,
    pub age_days: i64,
    pub overdue: bool,
}

/// One catalog row: the asset plus its active loan, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetListing {
    pub asset: Asset,
    pub loan: Option<LoanStatus>,
}

/// One overdue loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueLoan {
    pub asset_id: String,
    pub title: String,
    pub user_id: String,
    pub borrower_name: Option<String>,
    pub issue_date: i64,
    pub age_days: i64,
}

/// Orchestrates issue/return over the asset, user and loan repositories.
pub struct LoanService<'r, C: Clock = SystemClock> {
    assets: &'r dyn AssetRepository,
    users: &'r dyn UserRepository,
    loans: &'r dyn LoanRepository,
    clock: C,
}

impl<'r> LoanService<'r, SystemClock> {
    /// Creates a service reading time from the system clock.
    pub fn new(
        assets: &'r dyn AssetRepository,
        users: &'r dyn UserRepository,
        loans: &'r dyn LoanRepository,
    ) -> Self {
        Self::with_clock(assets, users, loans, SystemClock)
    }
}

impl<'r, C: Clock> LoanService<'r, C> {
    pub fn with_clock(
        assets: &'r dyn AssetRepository,
        users: &'r dyn UserRepository,
        loans: &'r dyn LoanRepository,
        clock: C,
    ) -> Self {
        Self {
            assets,
            users,
            loans,
            clock,
        }
    }

    /// Current time in epoch seconds, as seen by this service.
    pub fn now(&self) -> i64 {
        self.clock.now_epoch_secs()
    }

    /// Issues an available asset to an existing user.
    ///
    /// # Contract
    /// - Checks, in order: asset exists, asset available, user exists.
    /// - On success the asset is flagged issued and a loan dated `now` exists.
    /// - On any error nothing has changed.
    pub fn issue_asset(&self, asset_id: &str, user_id: &str) -> Result<Loan, LoanError> {
        let result = self.try_issue(asset_id, user_id);
        match &result {
            Ok(loan) => info!(
                "event=loan_issue module=service status=ok asset_id={} user_id={} issue_date={}",
                loan.asset_id, loan.user_id, loan.issue_date
            ),
            Err(err) => log_rejection("loan_issue", asset_id, err),
        }
        result
    }

    fn try_issue(&self, asset_id: &str, user_id: &str) -> Result<Loan, LoanError> {
        let asset = self
            .assets
            .find(asset_id)?
            .ok_or_else(|| LoanError::AssetNotFound(asset_id.to_string()))?;
        if asset.issued {
            return Err(LoanError::AlreadyIssued(asset.id));
        }
        if self.users.find(user_id)?.is_none() {
            return Err(LoanError::UserNotFound(user_id.to_string()));
        }

        let loan = Loan::new(asset.id.as_str(), user_id, self.now());
        self.loans.apply(&[
            LedgerWrite::SetAssetIssued {
                asset_id: asset.id.clone(),
                issued: true,
            },
            LedgerWrite::PutLoan(loan.clone()),
        ])?;
        Ok(loan)
    }

    /// Returns an issued asset.
    ///
    /// Yields the closed loan, or `None` when the asset was flagged issued
    /// without a loan row; that case clears the flag alone.
    pub fn return_asset(&self, asset_id: &str) -> Result<Option<Loan>, LoanError> {
        let result = self.try_return(asset_id);
        match &result {
            Ok(_) => info!("event=loan_return module=service status=ok asset_id={asset_id}"),
            Err(err) => log_rejection("loan_return", asset_id, err),
        }
        result
    }

    fn try_return(&self, asset_id: &str) -> Result<Option<Loan>, LoanError> {
        let asset = self
            .assets
            .find(asset_id)?
            .ok_or_else(|| LoanError::AssetNotFound(asset_id.to_string()))?;
        if !asset.issued {
            return Err(LoanError::NotIssued(asset.id));
        }

        let loan = self.loans.find(&asset.id)?;
        let mut writes = vec![LedgerWrite::SetAssetIssued {
            asset_id: asset.id.clone(),
            issued: false,
        }];
        if loan.is_some() {
            writes.push(LedgerWrite::DeleteLoan {
                asset_id: asset.id.clone(),
            });
        } else {
            warn!(
                "event=loan_return module=service status=repair reason=missing_loan_row asset_id={}",
                asset.id
            );
        }
        self.loans.apply(&writes)?;
        Ok(loan)
    }

    /// Active loan (borrower and issue date) for `asset_id`.
    ///
    /// `None` unless the asset exists and is flagged issued; a loan row left
    /// behind for an available asset is not an active loan.
    pub fn loan_info(&self, asset_id: &str) -> RepoResult<Option<Loan>> {
        match self.assets.find(asset_id)? {
            Some(asset) => self.active_loan(&asset),
            None => Ok(None),
        }
    }

    /// Every asset with its loan status, evaluated at the current time.
    pub fn list_all(&self) -> RepoResult<Vec<AssetListing>> {
        self.list_all_at(self.now())
    }

    /// Every asset with its loan status, evaluated at `now`.
    pub fn list_all_at(&self, now: i64) -> RepoResult<Vec<AssetListing>> {
        let assets = self.assets.get_all()?;
        let mut listings = Vec::with_capacity(assets.len());
        for asset in assets {
            let loan = match self.active_loan(&asset)? {
                Some(loan) => Some(self.loan_status(loan, now)?),
                None => None,
            };
            listings.push(AssetListing { asset, loan });
        }
        Ok(listings)
    }

    /// Assets currently held by `user_id`, evaluated at the current time.
    pub fn loans_for_user(&self, user_id: &str) -> RepoResult<Vec<AssetListing>> {
        self.loans_for_user_at(user_id, self.now())
    }

    /// Assets currently held by `user_id`, evaluated at `now`.
    ///
    /// Ordered by asset id. An unknown user holds nothing.
    pub fn loans_for_user_at(&self, user_id: &str, now: i64) -> RepoResult<Vec<AssetListing>> {
        let mut listings = Vec::new();
        for loan in self.loans.find_by_user(user_id)? {
            let Some(asset) = self.assets.find(&loan.asset_id)? else {
                continue;
            };
            let Some(active) = self.active_loan(&asset)? else {
                continue;
            };
            listings.push(AssetListing {
                loan: Some(self.loan_status(active, now)?),
                asset,
            });
        }
        Ok(listings)
    }

    /// Issued assets past the overdue threshold at the current time.
    pub fn show_overdues(&self) -> RepoResult<Vec<OverdueLoan>> {
        self.show_overdues_at(self.now())
    }

    /// Issued assets past the overdue threshold at `now`.
    pub fn show_overdues_at(&self, now: i64) -> RepoResult<Vec<OverdueLoan>> {
        let mut overdue = Vec::new();
        for asset in self.assets.get_all()? {
            let Some(loan) = self.active_loan(&asset)? else {
                continue;
            };
            if !loan.is_overdue(now) {
                continue;
            }
            overdue.push(OverdueLoan {
                borrower_name: self.borrower_name(&loan.user_id)?,
                age_days: loan.age_days(now),
                asset_id: asset.id,
                title: asset.title,
                user_id: loan.user_id,
                issue_date: loan.issue_date,
            });
        }
        Ok(overdue)
    }

    /// The only place a loan row is accepted as active: the asset must be
    /// flagged issued.
    fn active_loan(&self, asset: &Asset) -> RepoResult<Option<Loan>> {
        if !asset.issued {
            return Ok(None);
        }
        self.loans.find(&asset.id)
    }

    fn loan_status(&self, loan: Loan, now: i64) -> RepoResult<LoanStatus> {
        Ok(LoanStatus {
            borrower_name: self.borrower_name(&loan.user_id)?,
            age_days: loan.age_days(now),
            overdue: loan.is_overdue(now),
            user_id: loan.user_id,
            issue_date: loan.issue_date,
        })
    }

    fn borrower_name(&self, user_id: &str) -> RepoResult<Option<String>> {
        Ok(self.users.find(user_id)?.map(|user| user.name))
    }
}

fn log_rejection(event: &str, asset_id: &str, err: &LoanError) {
    match err.kind() {
        LoanErrorKind::Storage => error!(
            "event={event} module=service status=error error_code={} asset_id={asset_id} error={err}",
            err.code()
        ),
        LoanErrorKind::NotFound | LoanErrorKind::Conflict => info!(
            "event={event} module=service status=rejected error_code={} asset_id={asset_id}",
            err.code()
        ),
    }
}
