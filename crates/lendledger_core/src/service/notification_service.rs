//! Overdue notification service.
//!
//! # Responsibility
//! - Turn the loan service's overdue set into human-readable notices.
//! - Push notices to every injected sink independently.
//!
//! # Invariants
//! - The overdue set always comes from `LoanService::show_overdues_at`; this
//!   module never evaluates loan age itself.
//! - A failing sink is logged and recorded, then dispatch moves on.
//! - Nothing is sent when nothing is overdue.

use crate::clock::Clock;
use crate::notify::{NotificationSink, SinkError};
use crate::repo::RepoResult;
use crate::service::loan_service::{LoanService, OverdueLoan};
use log::{info, warn};
use std::collections::BTreeMap;

/// Rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// One failed delivery attempt.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub recipient: String,
    pub error: SinkError,
}

/// Outcome of one dispatch round.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Overdue set the notices were built from.
    pub overdue: Vec<OverdueLoan>,
    /// Number of notices built.
    pub notices: usize,
    /// Successful (notice, sink) deliveries.
    pub delivered: usize,
    pub failures: Vec<SinkFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Computes overdue loans and dispatches notices to injected sinks.
pub struct NotificationService<'r, C: Clock> {
    loans: &'r LoanService<'r, C>,
    sinks: Vec<Box<dyn NotificationSink + 'r>>,
    staff_recipient: String,
}

impl<'r, C: Clock> NotificationService<'r, C> {
    /// Creates a service with no sinks; staff summaries go to `staff_recipient`.
    pub fn new(loans: &'r LoanService<'r, C>, staff_recipient: impl Into<String>) -> Self {
        Self {
            loans,
            sinks: Vec::new(),
            staff_recipient: staff_recipient.into(),
        }
    }

    /// Adds a sink. Sinks are tried in insertion order.
    pub fn with_sink(mut self, sink: impl NotificationSink + 'r) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink + 'r>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Number of overdue loans right now. Sends nothing.
    pub fn count_overdue(&self) -> RepoResult<usize> {
        Ok(self.loans.show_overdues()?.len())
    }

    /// Sends one overdue summary to the staff recipient.
    pub fn notify_overdue(&self) -> RepoResult<DispatchReport> {
        self.notify_overdue_at(self.loans.now())
    }

    pub fn notify_overdue_at(&self, now: i64) -> RepoResult<DispatchReport> {
        let overdue = self.loans.show_overdues_at(now)?;
        let notices = if overdue.is_empty() {
            Vec::new()
        } else {
            vec![build_staff_summary(&self.staff_recipient, &overdue)]
        };
        Ok(self.dispatch("overdue_summary", overdue, notices))
    }

    /// Sends each borrower a reminder listing only their own overdue items.
    pub fn notify_borrowers(&self) -> RepoResult<DispatchReport> {
        self.notify_borrowers_at(self.loans.now())
    }

    pub fn notify_borrowers_at(&self, now: i64) -> RepoResult<DispatchReport> {
        let overdue = self.loans.show_overdues_at(now)?;
        let mut by_borrower: BTreeMap<&str, Vec<&OverdueLoan>> = BTreeMap::new();
        for item in &overdue {
            by_borrower.entry(item.user_id.as_str()).or_default().push(item);
        }
        let notices = by_borrower
            .into_values()
            .map(|items| build_borrower_reminder(&items))
            .collect();
        Ok(self.dispatch("borrower_reminder", overdue, notices))
    }

    fn dispatch(
        &self,
        event: &'static str,
        overdue: Vec<OverdueLoan>,
        notices: Vec<Notice>,
    ) -> DispatchReport {
        let mut report = DispatchReport {
            overdue,
            notices: notices.len(),
            ..DispatchReport::default()
        };

        for notice in &notices {
            for sink in &self.sinks {
                match sink.notify(&notice.recipient, &notice.subject, &notice.body) {
                    Ok(()) => report.delivered += 1,
                    Err(error) => {
                        warn!(
                            "event={event} module=notify status=error sink={} recipient={} error={}",
                            sink.name(),
                            notice.recipient,
                            error
                        );
                        report.failures.push(SinkFailure {
                            sink: sink.name().to_string(),
                            recipient: notice.recipient.clone(),
                            error,
                        });
                    }
                }
            }
        }

        info!(
            "event={event} module=notify status=ok overdue={} notices={} delivered={} failed={}",
            report.overdue.len(),
            report.notices,
            report.delivered,
            report.failures.len()
        );
        report
    }
}

/// Renders the staff summary for a non-empty overdue set.
pub fn build_staff_summary(recipient: &str, overdue: &[OverdueLoan]) -> Notice {
    let body = overdue
        .iter()
        .map(|item| {
            format!(
                "OVERDUE: {} ({}) borrowed {} days ago by {}",
                item.asset_id, item.title, item.age_days, item.user_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Notice {
        recipient: recipient.to_string(),
        subject: overdue_subject(overdue.len()),
        body,
    }
}

fn build_borrower_reminder(items: &[&OverdueLoan]) -> Notice {
    let first = items[0];
    let greeting = first.borrower_name.as_deref().unwrap_or(&first.user_id);
    let mut body = format!("Hello {greeting}, please return the following:");
    for item in items {
        body.push_str(&format!(
            "\n- {} ({}), borrowed {} days ago",
            item.asset_id, item.title, item.age_days
        ));
    }

    Notice {
        recipient: first.user_id.clone(),
        subject: overdue_subject(items.len()),
        body,
    }
}

fn overdue_subject(count: usize) -> String {
    if count == 1 {
        "1 overdue item".to_string()
    } else {
        format!("{count} overdue items")
    }
}
