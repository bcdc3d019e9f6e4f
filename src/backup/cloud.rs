//! Simulated cloud backup
//!
//! There is no remote endpoint. An upload waits for a fixed delay and then
//! reports success; the caller records the completion time in settings.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::MilkResult;
use crate::models::AppState;

/// Default simulated upload time
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Stand-in for a remote backup service
#[derive(Debug, Clone, Copy)]
pub struct CloudBackup {
    delay: Duration,
}

impl Default for CloudBackup {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl CloudBackup {
    /// Create a simulated service with the given upload time
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// "Upload" the state, returning the completion time
    ///
    /// Blocks for the configured delay and cannot be cancelled.
    pub fn upload(&self, state: &AppState) -> MilkResult<DateTime<Utc>> {
        tracing::debug!(
            entries = state.entries.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Starting simulated cloud backup"
        );
        thread::sleep(self.delay);
        Ok(Utc::now())
    }
}
