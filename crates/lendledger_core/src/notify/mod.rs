//! Notification delivery contract and bundled sinks.
//!
//! # Responsibility
//! - Define the single-method sink contract the notification service pushes to.
//! - Ship console and email-stub sinks for local deployments.
//!
//! # Invariants
//! - A sink reports its own failure; it never panics and never affects
//!   delivery through other sinks.

mod console;
mod email;

pub use console::ConsoleSink;
pub use email::EmailStubSink;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Delivery failure reported by one sink.
#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    /// Sink refused the message (bad recipient, channel closed, ...).
    Rejected(String),
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Rejected(reason) => write!(f, "notification rejected: {reason}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Rejected(_) => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// External notification delivery channel.
pub trait NotificationSink {
    /// Short stable name used in logs and dispatch reports.
    fn name(&self) -> &str;
    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), SinkError>;
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), SinkError> {
        (**self).notify(recipient, subject, body)
    }
}
