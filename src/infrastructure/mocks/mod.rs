//! Mock implementations for testing.
//!
//! This module provides test doubles for infrastructure adapters,
//! enabling controlled testing of the logging pipeline.

pub mod capture;
pub mod clock;
pub mod counter;

pub use capture::CaptureWriter;
pub use clock::MockClock;
pub use counter::{RecordedIncrement, RecordingCounter};
