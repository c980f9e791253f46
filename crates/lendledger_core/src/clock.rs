//! Wall-clock source for loan timestamps.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in Unix epoch seconds.
pub trait Clock {
    fn now_epoch_secs(&self) -> i64;
}

/// Reads the operating system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_epoch_secs(&self) -> i64 {
        (**self).now_epoch_secs()
    }
}
