//! Ledger status probe.
//!
//! # Responsibility
//! - Open the configured ledger and print a one-line status summary.
//! - With `--notify`, push the staff overdue summary to the email stub sink.
//!
//! The interactive menu lives elsewhere; this binary only verifies wiring.

use lendledger_core::db::open_db;
use lendledger_core::{
    core_version, init_logging, EmailStubSink, LedgerConfig, LoanService, NotificationService,
    SqliteAssetRepository, SqliteLoanRepository, SqliteUserRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let notify = std::env::args().skip(1).any(|arg| arg == "--notify");
    match run(notify) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lendledger: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(notify: bool) -> Result<(), Box<dyn Error>> {
    let config = LedgerConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let assets = SqliteAssetRepository::try_new(&conn)?;
    let users = SqliteUserRepository::try_new(&conn)?;
    let loans = SqliteLoanRepository::try_new(&conn)?;
    let loan_service = LoanService::new(&assets, &users, &loans);
    let notifier = NotificationService::new(&loan_service, config.notice_recipient.as_str())
        .with_sink(EmailStubSink::stdout(config.notice_sender.as_str()));

    let now = loan_service.now();
    let listings = loan_service.list_all_at(now)?;
    let issued = listings.iter().filter(|row| row.loan.is_some()).count();
    let overdue = listings
        .iter()
        .filter(|row| row.loan.as_ref().is_some_and(|loan| loan.overdue))
        .count();

    println!(
        "lendledger_core version={} db={} assets={} issued={} overdue={}",
        core_version(),
        config.db_path.display(),
        listings.len(),
        issued,
        overdue
    );

    if notify {
        let report = notifier.notify_overdue_at(now)?;
        info!(
            "event=cli_notify module=cli status=ok delivered={} failed={}",
            report.delivered,
            report.failures.len()
        );
        for failure in &report.failures {
            eprintln!(
                "lendledger: sink {} failed for {}: {}",
                failure.sink, failure.recipient, failure.error
            );
        }
    }
    Ok(())
}
