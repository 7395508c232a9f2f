//! # ratelog
//!
//! Process-wide, leveled logging with per-call-site rate limiting.
//!
//! Log calls are written as single lines in plain text or JSON, attributed to
//! the `file:line` that issued them. `WARN` and `ERROR` floods are bounded
//! per call site per second, every written line increments a
//! `log_messages_total` counter, and `FATAL`/`PANIC` end the calling context
//! after logging.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ratelog::{infof, warnf, LoggerConfig};
//!
//! ratelog::must_init(LoggerConfig {
//!     format: "json".to_string(),
//!     warns_per_second_limit: 10,
//!     app_version: env!("CARGO_PKG_VERSION").to_string(),
//!     ..LoggerConfig::default()
//! });
//!
//! infof!("started on port {}", 8080);
//! warnf!("retry {}", 3);
//! ```
//!
//! ## Output Formats
//!
//! Plain text (`format = "default"`), tab separated:
//!
//! ```text
//! 2024-03-01T12:30:45.123Z	INFO	src/main.rs:12	started on port 8080
//! ```
//!
//! JSON (`format = "json"`), keys in fixed order:
//!
//! ```text
//! {"ts":"2024-03-01T12:30:45.123Z","level":"WARN","caller":"src/main.rs:13","msg":"retry 3"}
//! ```
//!
//! Timestamps have millisecond precision and are rendered in the configured
//! timezone (`Z` for a zero offset, `+hhmm` otherwise). With
//! `disable_timestamps` the `ts` field is omitted entirely. Trailing newlines
//! of a message collapse into the single line terminator.
//!
//! ## Severities
//!
//! | Severity | Rate limited | After logging |
//! |----------|--------------|---------------|
//! | `INFO`   | no           | returns |
//! | `WARN`   | `warns_per_second_limit` | returns |
//! | `ERROR`  | `errors_per_second_limit` | returns |
//! | `FATAL`  | no           | exits with status 255 |
//! | `PANIC`  | no           | panics with the message (text) or exits with status 255 (JSON) |
//!
//! Messages below the configured minimum `level` are dropped without being
//! formatted. This includes `FATAL` and `PANIC`: a gated terminal call
//! returns to its caller.
//!
//! ## Rate Limiting
//!
//! With a limit `L > 0`, each call site may write `L` messages per window
//! unchanged. Message `L + 1` is written with the prefix
//! `suppressing log message with rate limit=L: `, and every later message from
//! that call site is dropped until the window ends. Windows are global: all
//! counters are cleared together once per second by a background thread
//! started by [`init`]. A limit of `0` disables limiting.
//!
//! ```rust
//! use ratelog::{CallSite, Logger};
//! use ratelog::infrastructure::mocks::CaptureWriter;
//!
//! let output = CaptureWriter::new();
//! let logger = Logger::builder()
//!     .with_timestamps_disabled(true)
//!     .with_warns_per_second_limit(2)
//!     .build()
//!     .unwrap();
//! logger.set_output_for_tests(Box::new(output.clone()));
//!
//! let site = CallSite::new("src/worker.rs", 40);
//! for _ in 0..3 {
//!     logger.warnf_at(site, format_args!("x"));
//! }
//!
//! assert_eq!(output.lines(), vec![
//!     "WARN\tsrc/worker.rs:40\tx",
//!     "WARN\tsrc/worker.rs:40\tx",
//!     "WARN\tsrc/worker.rs:40\tsuppressing log message with rate limit=2: x",
//! ]);
//! ```
//!
//! ## Call Sites
//!
//! The location is captured with `#[track_caller]`. Helpers that log on behalf
//! of their callers mark themselves `#[track_caller]` too, so the location
//! resolves to *their* caller:
//!
//! ```rust,no_run
//! #[track_caller]
//! fn report_slow_query(millis: u64) {
//!     ratelog::warnf(format_args!("slow query: {}ms", millis));
//! }
//! ```
//!
//! Code that already holds a location uses the `*_at` variants with an
//! explicit [`CallSite`].
//!
//! ## Metrics
//!
//! Every written line increments
//! `log_messages_total{app_version="..", level="..", location=".."}` through the
//! [`MessageCounter`] port. By default increments go to the `metrics` facade
//! ([`MetricsFacadeCounter`]); [`CounterRegistry`] keeps them in process.
//!
//! ## Tracing Integration
//!
//! [`LogBridgeLayer`] forwards `tracing` events at `INFO`, `WARN` and `ERROR`
//! into the logger, so instrumented libraries share its stream, limits and
//! counters.
//!
//! ## Testing
//!
//! With the `test-helpers` feature, [`Logger::set_output_for_tests`] redirects
//! output and [`infrastructure::mocks`] provides `CaptureWriter`, `MockClock`
//! and `RecordingCounter`.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

mod global;

// Re-export commonly used types for convenience
pub use domain::{
    counter::CounterKey,
    location::CallSite,
    policy::{Suppression, WindowPolicy},
    record::LogRecord,
    severity::{ParseSeverityError, Severity},
};

pub use application::{
    config::{ConfigError, LoggerConfig, ResetConfig},
    formatter::{Format, JsonFields, MessageFormatter},
    limiter::RateLimiter,
    ports::{Clock, MessageCounter},
    reset::{ResetHandle, ResetTask, ShutdownError},
    terminal::{Terminal, TERMINAL_EXIT_CODE},
};

#[cfg(feature = "async")]
pub use application::reset::AsyncResetHandle;

pub use infrastructure::{
    clock::SystemClock,
    counters::{CounterRegistry, MetricsFacadeCounter},
    layer::{GlobalLogger, LogBridgeLayer},
    logger::{Emission, Logger, LoggerBuilder},
    output::OutputTarget,
    timezone::LogTimeZone,
    writer::ErrorWriter,
};

pub use global::{
    enabled, error_writer, errorf, errorf_at, fatalf, infof, init, init_with, is_initialized,
    logger, must_init, panicf, shutdown_reset_task, warnf, warnf_at, InitError,
    INIT_FAILURE_EXIT_CODE,
};

/// Log at `INFO` through the process-wide logger.
///
/// ```rust,no_run
/// ratelog::infof!("started on port {}", 8080);
/// ```
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::infof(::core::format_args!($($arg)+))
    };
}

/// Log at `WARN` through the process-wide logger.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::warnf(::core::format_args!($($arg)+))
    };
}

/// Log at `ERROR` through the process-wide logger.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::errorf(::core::format_args!($($arg)+))
    };
}

/// Log at `FATAL` through the process-wide logger and exit with status 255.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatalf(::core::format_args!($($arg)+))
    };
}

/// Log at `PANIC` through the process-wide logger, then panic (text format)
/// or exit with status 255 (JSON format).
#[macro_export]
macro_rules! panicf {
    ($($arg:tt)+) => {
        $crate::panicf(::core::format_args!($($arg)+))
    };
}

/// Log at `WARN` attributed to an explicit [`CallSite`].
///
/// ```rust,no_run
/// let site = ratelog::CallSite::new("src/pool.rs", 88);
/// ratelog::warnf_at!(site, "pool exhausted: {} waiters", 12);
/// ```
#[macro_export]
macro_rules! warnf_at {
    ($site:expr, $($arg:tt)+) => {
        $crate::warnf_at($site, ::core::format_args!($($arg)+))
    };
}

/// Log at `ERROR` attributed to an explicit [`CallSite`].
#[macro_export]
macro_rules! errorf_at {
    ($site:expr, $($arg:tt)+) => {
        $crate::errorf_at($site, ::core::format_args!($($arg)+))
    };
}
