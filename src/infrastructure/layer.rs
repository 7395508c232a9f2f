//! Tracing integration layer.
//!
//! Provides a `tracing_subscriber::Layer` that routes `tracing` events into a
//! [`Logger`], so libraries instrumented with `tracing` end up in the same
//! stream, with the same rate limits and counters, as direct log calls.
//!
//! Level mapping:
//!
//! | tracing          | logger  |
//! |------------------|---------|
//! | `INFO`           | `INFO`  |
//! | `WARN`           | `WARN`  |
//! | `ERROR`          | `ERROR` |
//! | `DEBUG`, `TRACE` | dropped |
//!
//! The call site is taken from the event metadata and rendered as `???:0`
//! when the event carries no file or line.
//!
//! ```rust,no_run
//! use ratelog::{LogBridgeLayer, LoggerConfig};
//! use tracing_subscriber::prelude::*;
//!
//! // The layer looks the logger up per event, so it may be built before `init`
//! tracing_subscriber::registry()
//!     .with(LogBridgeLayer::global())
//!     .init();
//! ratelog::init(LoggerConfig::default()).unwrap();
//!
//! tracing::warn!(attempt = 3, "retrying upstream");
//! ```

use crate::domain::{location::CallSite, severity::Severity};
use crate::infrastructure::logger::Logger;
use crate::infrastructure::visitor::FieldVisitor;

use std::ops::Deref;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

/// Handle to the process-wide logger, looked up on every dereference.
///
/// A layer built before [`crate::init`] still reaches the installed logger
/// once `init` has run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalLogger;

impl Deref for GlobalLogger {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        crate::logger()
    }
}

/// Layer forwarding `tracing` events to a [`Logger`].
#[derive(Debug, Clone)]
pub struct LogBridgeLayer<L = GlobalLogger> {
    logger: L,
}

impl LogBridgeLayer {
    /// Forward to the process-wide logger.
    pub fn global() -> Self {
        Self {
            logger: GlobalLogger,
        }
    }
}

impl<L> LogBridgeLayer<L>
where
    L: Deref<Target = Logger>,
{
    /// Forward to `logger`.
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    /// Get a reference to the target logger.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Logger severity for a `tracing` level, `None` for levels without one.
pub fn severity_for(level: &Level) -> Option<Severity> {
    if *level == Level::ERROR {
        Some(Severity::Error)
    } else if *level == Level::WARN {
        Some(Severity::Warn)
    } else if *level == Level::INFO {
        Some(Severity::Info)
    } else {
        None
    }
}

impl<S, L> Layer<S> for LogBridgeLayer<L>
where
    S: Subscriber,
    L: Deref<Target = Logger> + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = match severity_for(metadata.level()) {
            Some(level) => level,
            None => return,
        };
        let logger: &Logger = &self.logger;
        if !logger.enabled(level) {
            return;
        }

        let site = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => CallSite::new(file, line),
            _ => CallSite::unknown(),
        };

        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);
        logger.log_message(level, site, visitor.into_message());
    }
}
