//! System clock — strictly monotonic probe stamps and real sleeping.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::application::ports::Clock;

/// Production clock.
///
/// Stamps are wall-clock nanoseconds floored at one more than the previous
/// stamp, so no two stamps issued within one process are ever equal even if
/// the wall clock stalls or steps backward.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_stamp: AtomicI64,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn stamp_nanos(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut last = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last_stamp
                .compare_exchange(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(observed) => last = observed,
            }
        }
    }

    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}
