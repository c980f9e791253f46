//! Email stub sink.
//!
//! # Invariants
//! - Blank recipients are rejected before anything is written.
//! - Each notice is flushed as one `[EMAIL STUB]` block.

use super::{NotificationSink, SinkError};
use std::cell::RefCell;
use std::io::{Stdout, Write};

/// Renders notices as plain-text emails instead of sending them.
///
/// Stands in for a real mail transport until one is wired in.
pub struct EmailStubSink<W: Write = Stdout> {
    from: String,
    out: RefCell<W>,
}

impl EmailStubSink<Stdout> {
    pub fn stdout(from: impl Into<String>) -> Self {
        Self::with_writer(from, std::io::stdout())
    }
}

impl<W: Write> EmailStubSink<W> {
    pub fn with_writer(from: impl Into<String>, out: W) -> Self {
        Self {
            from: from.into(),
            out: RefCell::new(out),
        }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> NotificationSink for EmailStubSink<W> {
    fn name(&self) -> &str {
        "email_stub"
    }

    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), SinkError> {
        if recipient.trim().is_empty() {
            return Err(SinkError::Rejected("empty email recipient".to_string()));
        }
        let mut out = self
            .out
            .try_borrow_mut()
            .map_err(|_| SinkError::Rejected("email writer is busy".to_string()))?;
        write!(
            out,
            "[EMAIL STUB]\nFrom: {}\nTo: {recipient}\nSubject: {subject}\n\n{body}\n---------------------------\n",
            self.from
        )?;
        out.flush()?;
        Ok(())
    }
}
