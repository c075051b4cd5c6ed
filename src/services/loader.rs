//! Month data loading with retry and stale-response suppression

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::services::client::CalendarClient;
use crate::services::config::RetryConfig;
use crate::types::{CalendarItem, Month, Result};

/// Upper bound on a single backoff delay
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Exponential backoff for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-based): base, 2*base, 4*base, ...
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Run `op`, retrying transient errors until attempts run out
    pub fn run<T>(&self, what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(what, attempt, ?delay, error = %e, "transient failure, retrying");
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Fetch appointments and events for `month` in parallel.
/// Appointments come first in the returned list.
pub fn load_month(
    client: &dyn CalendarClient,
    month: Month,
    policy: RetryPolicy,
) -> Result<Vec<CalendarItem>> {
    let (appointments, events) = rayon::join(
        || policy.run("fetch appointments", || client.fetch_appointments(month)),
        || policy.run("fetch events", || client.fetch_events(month)),
    );
    let mut items = appointments?;
    items.extend(events?);
    info!(%month, count = items.len(), "month loaded");
    Ok(items)
}

/// Result of a background month fetch, tagged with its request generation
#[derive(Debug)]
pub struct MonthLoad {
    pub generation: u64,
    pub month: Month,
    pub result: Result<Vec<CalendarItem>>,
}

/// Hands out request generations and tells which responses are still current
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadTracker {
    latest: u64,
    in_flight: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request; earlier ones become stale
    pub fn start(&mut self) -> u64 {
        self.latest += 1;
        self.in_flight = true;
        self.latest
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Accept a response. Returns false (and changes nothing) for stale generations.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.latest {
            return false;
        }
        self.in_flight = false;
        true
    }
}
