//! Console notification sink.
//!
//! One `[recipient] subject` line followed by the body, flushed per notice.

use super::{NotificationSink, SinkError};
use std::cell::RefCell;
use std::io::{Stdout, Write};

/// Writes one compact block per notice to a terminal-like writer.
pub struct ConsoleSink<W: Write = Stdout> {
    out: RefCell<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> NotificationSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, recipient: &str, subject: &str, body: &str) -> Result<(), SinkError> {
        let mut out = self
            .out
            .try_borrow_mut()
            .map_err(|_| SinkError::Rejected("console writer is busy".to_string()))?;
        writeln!(out, "[{recipient}] {subject}")?;
        writeln!(out, "{body}")?;
        out.flush()?;
        Ok(())
    }
}
