//! Poll-loop configuration.

use std::time::Duration;

/// Retry budget for the poll loop.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 20;

/// Fixed interval slept before every status query, including the first.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Poll-loop tuning, constructed once at startup and passed into the
/// workflow. Tests inject a small budget and a fake clock instead of
/// patching process globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Maximum number of status queries before the probe resolves not-ready.
    pub poll_attempts: u32,
    /// Interval slept before each status query.
    pub poll_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
