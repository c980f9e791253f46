//! Core domain logic for the lending ledger.
//! This crate is the single source of truth for loan invariants.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use auth::{Argon2CredentialVerifier, CredentialError, CredentialVerifier};
pub use clock::{Clock, SystemClock};
pub use config::{ConfigError, LedgerConfig};
pub use db::{DbError, DbResult, LedgerWrite};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::asset::{Asset, AssetType};
pub use model::loan::{Loan, OVERDUE_AFTER_DAYS, SECONDS_PER_DAY};
pub use model::user::{Role, User};
pub use model::ValidationError;
pub use notify::{ConsoleSink, EmailStubSink, NotificationSink, SinkError};
pub use repo::asset_repo::{AssetRepository, SqliteAssetRepository};
pub use repo::loan_repo::{LoanRepository, SqliteLoanRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{AccountError, AccountService};
pub use service::loan_service::{
    AssetListing, LoanError, LoanErrorKind, LoanService, LoanStatus, OverdueLoan,
};
pub use service::notification_service::{
    DispatchReport, Notice, NotificationService, SinkFailure,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
