//! Recording counter for testing.

use crate::application::ports::MessageCounter;
use crate::domain::counter::CounterKey;
use crate::domain::severity::Severity;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded increment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RecordedIncrement {
    pub app_version: String,
    pub level: Severity,
    pub location: String,
}

/// Counter that remembers every increment in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingCounter {
    records: Arc<Mutex<Vec<RecordedIncrement>>>,
}

impl RecordingCounter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All increments so far.
    pub fn records(&self) -> Vec<RecordedIncrement> {
        self.lock().clone()
    }

    /// Number of increments so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Number of increments for one level and location.
    pub fn count_for(&self, level: Severity, location: &str) -> usize {
        self.lock()
            .iter()
            .filter(|r| r.level == level && r.location == location)
            .count()
    }

    /// Forget all recorded increments.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedIncrement>> {
        self.records.lock().expect(
            "RecordingCounter mutex poisoned - a test thread panicked while holding the lock",
        )
    }
}

impl MessageCounter for RecordingCounter {
    fn increment(&self, key: &CounterKey<'_>) {
        self.lock().push(RecordedIncrement {
            app_version: key.app_version.to_string(),
            level: key.level,
            location: key.location.to_string(),
        });
    }
}
