//! When the next remote fetch is due

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::registry::ButtonRegistry;

/// Fetch cadence derived from the registered buttons.
///
/// The interval is the smallest poll frequency of any button, or the
/// default when no button is registered.
#[derive(Debug, Clone)]
pub struct RefreshState {
    last_refresh: Option<DateTime<Utc>>,
    current_interval: Duration,
    default_interval: Duration,
}

impl RefreshState {
    /// Never refreshed, using `default_interval` until buttons register.
    pub fn new(default_interval: Duration) -> Self {
        Self { last_refresh: None, current_interval: default_interval, default_interval }
    }

    /// Re-derive the interval after the registry changed.
    pub fn recompute(&mut self, registry: &ButtonRegistry) {
        self.current_interval = registry.min_poll_frequency().unwrap_or(self.default_interval);
    }

    /// Interval between remote fetches.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    /// When the last fetch started.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// True when nothing was fetched yet or the interval has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let Some(last) = self.last_refresh else {
            return true;
        };
        match (now - last).to_std() {
            Ok(since) => since >= self.current_interval,
            // Clock went backwards
            Err(_) => true,
        }
    }

    /// Record a fetch started at `now`.
    pub fn mark_refreshed(&mut self, now: DateTime<Utc>) {
        self.last_refresh = Some(now);
    }

    /// Make the next check due regardless of the interval.
    pub fn invalidate(&mut self) {
        self.last_refresh = None;
    }
}
