//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::counter::CounterKey;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Port for obtaining the current wall-clock time.
///
/// Timestamps are rendered from this clock, so tests can pin them.
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Port for the emitted-messages counter.
///
/// The logger only ever increments; reading the counters back is the
/// business of whatever registry sits behind this port.
/// Infrastructure provides concrete implementations (MetricsFacadeCounter,
/// CounterRegistry).
pub trait MessageCounter: Send + Sync + Debug {
    /// Increment the series identified by `key` by one.
    fn increment(&self, key: &CounterKey<'_>);
}
