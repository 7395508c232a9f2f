//! Per-location rate limiter.
//!
//! The limiter bounds how many `WARN` and `ERROR` messages each call site may
//! emit per reset window. All locations share one window: a background task
//! calls [`RateLimiter::reset`] at a fixed interval, replacing the whole
//! counter map at once.

use crate::domain::policy::{Suppression, WindowPolicy};
use ahash::RandomState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type CounterMap = HashMap<String, u64, RandomState>;

/// Coordinates rate limiting decisions for all call sites.
///
/// The counter map is guarded by a single lock, so a reset is atomic with
/// respect to every concurrent decision. No I/O happens under the lock.
#[derive(Debug, Default)]
pub struct RateLimiter {
    counts: Mutex<CounterMap>,
}

impl RateLimiter {
    /// Create a limiter with no tracked locations.
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(CounterMap::default()),
        }
    }

    /// Decide whether a message from `location` should be suppressed.
    ///
    /// # Arguments
    /// * `limit` - Messages allowed per window for this severity; `0` disables limiting
    /// * `location` - Rendered `file:line` of the caller
    ///
    /// # Returns
    /// `Suppression::Allow` for the first `limit` messages of the window,
    /// `Suppression::Announce` (carrying the prefix to prepend) for message
    /// `limit + 1`, and `Suppression::Suppress` after that.
    pub fn should_suppress(&self, limit: u64, location: &str) -> Suppression {
        let policy = WindowPolicy::new(limit);

        // Fast path: no lock when limiting is disabled
        if policy.is_disabled() {
            return Suppression::Allow;
        }

        let mut counts = self.lock();
        if let Some(count) = counts.get_mut(location) {
            return policy.register(count);
        }

        let mut count = 0;
        let decision = policy.register(&mut count);
        counts.insert(location.to_string(), count);
        decision
    }

    /// Forget all counters, starting a new window for every location.
    pub fn reset(&self) {
        let mut counts = self.lock();
        let capacity = counts.len();
        *counts = CounterMap::with_capacity_and_hasher(capacity, RandomState::new());
    }

    /// Number of locations counted in the current window.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no location has been counted in the current window.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current window count for a location.
    pub fn count_for(&self, location: &str) -> Option<u64> {
        self.lock().get(location).copied()
    }

    fn lock(&self) -> MutexGuard<'_, CounterMap> {
        // Counters stay usable even if a holder panicked
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
