//! Fixed-rate pacing of collection passes.

use std::time::Duration;

use tokio::time::Instant;

use crate::{ShutdownSignal, Wake};

/// Paces passes so that they start once per interval.
///
/// The wait after a pass is shortened by the time the pass took. A pass
/// that overruns the interval is followed immediately by the next one; missed
/// ticks are neither caught up nor counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollScheduler {
    interval: Duration,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// How long to wait after a pass that took `elapsed`.
    pub fn sleep_time(&self, elapsed: Duration) -> Duration {
        self.interval.saturating_sub(elapsed)
    }

    /// Wait until one interval after `pass_started`.
    ///
    /// Returns immediately when the pass overran, reporting `Wake::Shutdown`
    /// if cancellation is already pending so that overrunning passes cannot
    /// starve it.
    pub async fn wait_next(&self, pass_started: Instant, shutdown: &mut ShutdownSignal) -> Wake {
        let elapsed = Instant::now().saturating_duration_since(pass_started);
        let sleep = self.sleep_time(elapsed);
        if sleep.is_zero() {
            if shutdown.is_triggered() {
                Wake::Shutdown
            } else {
                Wake::Elapsed
            }
        } else {
            shutdown.sleep(sleep).await
        }
    }
}
