//! Dispatch rate gate
//!
//! Enforces a minimum wall-clock interval between calls into the
//! automation driver. The driver types into a live browser session; two
//! prompts landing close together corrupt each other's input.
//!
//! The previous-dispatch timestamp is read, the deficit slept off, and
//! the new timestamp written all while holding one lock, so concurrent
//! requests serialize and the interval holds between any two dispatches.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide gate serializing dispatches into the automation driver.
pub struct RateGate {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Create a gate enforcing `min_interval` between dispatches.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Block until at least the minimum interval has passed since the
    /// previous `acquire` returned, then record the new dispatch time.
    ///
    /// Suspends only the calling task; the first caller passes straight
    /// through.
    pub async fn acquire(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
