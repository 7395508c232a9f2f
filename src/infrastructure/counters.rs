//! Adapters for the emitted-messages counter.
//!
//! - [`MetricsFacadeCounter`] forwards every increment to the `metrics`
//!   facade, so whatever recorder the host application installed (Prometheus
//!   exporter, statsd, ...) owns the series. This is the default.
//! - [`CounterRegistry`] keeps the series in process, keyed by their full
//!   `log_messages_total{...}` name, for hosts that expose counters themselves.

use crate::application::ports::MessageCounter;
use crate::domain::counter::CounterKey;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Forwards increments to the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsFacadeCounter;

impl MetricsFacadeCounter {
    /// Create a new facade counter.
    pub fn new() -> Self {
        Self
    }
}

impl MessageCounter for MetricsFacadeCounter {
    fn increment(&self, key: &CounterKey<'_>) {
        metrics::counter!(
            CounterKey::METRIC_NAME,
            "app_version" => key.app_version.to_string(),
            "level" => key.level.as_str(),
            "location" => key.location.to_string()
        )
        .increment(1);
    }
}

/// In-process counter registry.
///
/// Series are created on first increment and never removed.
///
/// # Example
/// ```
/// use ratelog::infrastructure::counters::CounterRegistry;
/// use ratelog::application::ports::MessageCounter;
/// use ratelog::domain::counter::CounterKey;
/// use ratelog::Severity;
///
/// let registry = CounterRegistry::new();
/// let key = CounterKey { app_version: "1.0.0", level: Severity::Warn, location: "src/db.rs:7" };
///
/// registry.increment(&key);
/// registry.increment(&key);
///
/// assert_eq!(
///     registry.get(r#"log_messages_total{app_version="1.0.0", level="WARN", location="src/db.rs:7"}"#),
///     2
/// );
/// ```
#[derive(Debug, Default)]
pub struct CounterRegistry {
    series: DashMap<String, AtomicU64>,
}

impl CounterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            series: DashMap::new(),
        }
    }

    /// Current value of a series, `0` if it was never incremented.
    pub fn get(&self, series_name: &str) -> u64 {
        self.series
            .get(series_name)
            .map(|value| value.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum over all series.
    pub fn total(&self) -> u64 {
        self.series
            .iter()
            .map(|entry| entry.value().load(Ordering::Relaxed))
            .sum()
    }

    /// Number of distinct series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if no series exists yet.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// All series and their values, sorted by name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut series: Vec<_> = self
            .series
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();
        series.sort();
        series
    }
}

impl MessageCounter for CounterRegistry {
    fn increment(&self, key: &CounterKey<'_>) {
        let name = key.series_name();

        // Existing series: shared lock only
        if let Some(value) = self.series.get(&name) {
            value.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.series
            .entry(name)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }
}
