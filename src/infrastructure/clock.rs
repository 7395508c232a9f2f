//! Wall-clock source for log timestamps.
//!
//! [`SystemClock`] reads the host clock in UTC; the configured
//! [`LogTimeZone`](crate::LogTimeZone) converts it only when a line is
//! rendered. Tests pin the time with `MockClock` from
//! `crate::infrastructure::mocks` (feature `test-helpers`).

use crate::application::ports::Clock;
use chrono::{DateTime, Utc};

/// Host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
