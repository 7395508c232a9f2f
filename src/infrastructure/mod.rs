//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Timezone resolution and timestamp rendering
//! - Standard stream destinations
//! - Counter backends (`metrics` facade, in-process registry)
//! - The logger itself and its builder
//! - Tracing integration (Layer trait) and an `io::Write` adapter

pub mod clock;
pub mod counters;
pub mod layer;
pub mod logger;
pub mod output;
pub mod timezone;
pub(crate) mod visitor;
pub mod writer;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds. It provides controllable test doubles for testing
/// logging behavior.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// ratelog = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
