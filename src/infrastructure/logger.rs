//! The leveled logger.
//!
//! A [`Logger`] owns all logging state: the minimum-level gate, the rate
//! limiter, the formatter, the output sink and the counter port. Every call
//! runs the same pipeline:
//!
//! ```text
//! level gate -> call site -> rate limit -> format -> write -> count -> terminal action
//! ```
//!
//! Messages below the minimum level are never formatted. Only `WARN` and
//! `ERROR` go through the rate limiter. `FATAL` and `PANIC` never return.
//!
//! Most applications use the process-wide logger through [`crate::init`] and
//! the `infof!`/`warnf!`/... macros; a `Logger` can also be built and owned
//! directly.

use crate::application::{
    config::{ConfigError, LoggerConfig, ResetConfig, DEFAULT_APP_VERSION, DEFAULT_RESET_INTERVAL},
    formatter::{Format, JsonFields, MessageFormatter},
    limiter::RateLimiter,
    ports::{Clock, MessageCounter},
    reset::{ResetHandle, ResetTask},
    sink::OutputSink,
    terminal::Terminal,
};
use crate::domain::{
    counter::CounterKey, location::CallSite, policy::Suppression, record::LogRecord,
    severity::Severity,
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::counters::MetricsFacadeCounter;
use crate::infrastructure::output::OutputTarget;
use crate::infrastructure::timezone::LogTimeZone;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "async")]
use crate::application::reset::AsyncResetHandle;

#[cfg(any(test, feature = "test-helpers"))]
use crate::application::sink::BoxedWriter;

/// Outcome of one pass through the logging pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// Below the minimum level; nothing was formatted or written
    Skipped,
    /// Dropped by the rate limiter; nothing was written or counted
    Suppressed,
    /// Written and counted
    Written {
        /// Action the caller must carry out for terminal severities
        terminal: Option<Terminal>,
    },
}

impl Emission {
    /// Returns true if a line was written.
    pub fn is_written(&self) -> bool {
        matches!(self, Emission::Written { .. })
    }

    /// Terminal action, if any.
    pub fn into_terminal(self) -> Option<Terminal> {
        match self {
            Emission::Written { terminal } => terminal,
            Emission::Skipped | Emission::Suppressed => None,
        }
    }
}

/// Builder for constructing a [`Logger`].
///
/// # Example
/// ```
/// use ratelog::{Format, Logger, Severity};
///
/// let logger = Logger::builder()
///     .with_format(Format::Json)
///     .with_min_level(Severity::Warn)
///     .with_warns_per_second_limit(10)
///     .with_app_version("1.4.2")
///     .build()
///     .unwrap();
///
/// assert!(!logger.enabled(Severity::Info));
/// assert!(logger.enabled(Severity::Error));
/// ```
pub struct LoggerBuilder {
    format: Format,
    json_fields: JsonFields,
    output: OutputTarget,
    timezone: LogTimeZone,
    disable_timestamps: bool,
    min_level: Severity,
    warns_per_second_limit: u64,
    errors_per_second_limit: u64,
    root_marker: Option<String>,
    app_version: String,
    reset_interval: Duration,
    clock: Option<Arc<dyn Clock>>,
    counter: Option<Arc<dyn MessageCounter>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            format: Format::default(),
            json_fields: JsonFields::default(),
            output: OutputTarget::default(),
            timezone: LogTimeZone::default(),
            disable_timestamps: false,
            min_level: Severity::default(),
            warns_per_second_limit: 0,
            errors_per_second_limit: 0,
            root_marker: None,
            app_version: DEFAULT_APP_VERSION.to_string(),
            reset_interval: DEFAULT_RESET_INTERVAL,
            clock: None,
            counter: None,
        }
    }
}

impl LoggerBuilder {
    /// Start from raw configuration values.
    ///
    /// # Errors
    /// Returns the `ConfigError` of the first invalid value: unsupported
    /// format or output, unknown timezone or level, malformed JSON renames.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, ConfigError> {
        let builder = Self::default()
            .with_format(config.format.parse()?)
            .with_json_fields(JsonFields::parse(&config.json_fields)?)
            .with_output(config.output.parse()?)
            .with_timezone(LogTimeZone::resolve(&config.timezone)?)
            .with_timestamps_disabled(config.disable_timestamps)
            .with_min_level(config.level.parse()?)
            .with_warns_per_second_limit(config.warns_per_second_limit)
            .with_errors_per_second_limit(config.errors_per_second_limit)
            .with_app_version(config.app_version.clone());

        Ok(match &config.root_marker {
            Some(marker) => builder.with_root_marker(marker.clone()),
            None => builder,
        })
    }

    /// Set the output encoding.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the JSON key names.
    pub fn with_json_fields(mut self, fields: JsonFields) -> Self {
        self.json_fields = fields;
        self
    }

    /// Set the standard stream to write to.
    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    /// Set the zone timestamps are rendered in.
    pub fn with_timezone(mut self, timezone: LogTimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Omit the timestamp field from every line.
    pub fn with_timestamps_disabled(mut self, disabled: bool) -> Self {
        self.disable_timestamps = disabled;
        self
    }

    /// Set the minimum severity that is written.
    pub fn with_min_level(mut self, level: Severity) -> Self {
        self.min_level = level;
        self
    }

    /// Limit `WARN` messages per location per window. `0` disables limiting.
    pub fn with_warns_per_second_limit(mut self, limit: u64) -> Self {
        self.warns_per_second_limit = limit;
        self
    }

    /// Limit `ERROR` messages per location per window. `0` disables limiting.
    pub fn with_errors_per_second_limit(mut self, limit: u64) -> Self {
        self.errors_per_second_limit = limit;
        self
    }

    /// Strip everything up to and including `marker` from caller file names.
    pub fn with_root_marker(mut self, marker: impl Into<String>) -> Self {
        self.root_marker = Some(marker.into());
        self
    }

    /// Set the `app_version` counter label.
    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    /// Set the rate limiting window length.
    ///
    /// The interval will be validated when `build()` is called.
    pub fn with_reset_interval(mut self, interval: Duration) -> Self {
        self.reset_interval = interval;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the counter incremented for every written message.
    ///
    /// Defaults to [`MetricsFacadeCounter`].
    pub fn with_counter(mut self, counter: Arc<dyn MessageCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Build the logger.
    ///
    /// The reset task is not started; see [`Logger::spawn_reset_task`].
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroResetInterval` if the reset interval is zero.
    pub fn build(self) -> Result<Logger, ConfigError> {
        let reset = ResetConfig::new(self.reset_interval)?;
        Ok(self.assemble(reset))
    }

    fn assemble(self, reset: ResetConfig) -> Logger {
        Logger {
            min_level: self.min_level,
            formatter: MessageFormatter::new(self.format, self.json_fields),
            timezone: self.timezone,
            disable_timestamps: self.disable_timestamps,
            warns_per_second_limit: self.warns_per_second_limit,
            errors_per_second_limit: self.errors_per_second_limit,
            root_marker: self.root_marker.filter(|marker| !marker.is_empty()),
            app_version: self.app_version,
            output: self.output,
            reset,
            limiter: Arc::new(RateLimiter::new()),
            sink: OutputSink::new(self.output.writer()),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
            counter: self
                .counter
                .unwrap_or_else(|| Arc::new(MetricsFacadeCounter::new())),
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("format", &self.format)
            .field("output", &self.output)
            .field("timezone", &self.timezone)
            .field("min_level", &self.min_level)
            .field("warns_per_second_limit", &self.warns_per_second_limit)
            .field("errors_per_second_limit", &self.errors_per_second_limit)
            .field("reset_interval", &self.reset_interval)
            .finish_non_exhaustive()
    }
}

/// Leveled, rate limited logger.
#[derive(Debug)]
pub struct Logger {
    min_level: Severity,
    formatter: MessageFormatter,
    timezone: LogTimeZone,
    disable_timestamps: bool,
    warns_per_second_limit: u64,
    errors_per_second_limit: u64,
    root_marker: Option<String>,
    app_version: String,
    output: OutputTarget,
    reset: ResetConfig,
    limiter: Arc<RateLimiter>,
    sink: OutputSink,
    clock: Arc<dyn Clock>,
    counter: Arc<dyn MessageCounter>,
}

impl Logger {
    /// Create a builder for configuring the logger.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Create a logger with default settings: text to stderr, UTC
    /// timestamps, everything from `INFO` up, no rate limiting.
    pub fn new() -> Self {
        LoggerBuilder::default().assemble(ResetConfig::default())
    }

    /// Returns true if messages of `level` pass the minimum-level gate.
    #[inline]
    pub fn enabled(&self, level: Severity) -> bool {
        level >= self.min_level
    }

    /// Log a message at `level` attributed to `site`.
    ///
    /// The arguments are only formatted if `level` passes the gate. Terminal
    /// actions are returned, not carried out.
    pub fn log(&self, level: Severity, site: CallSite, args: fmt::Arguments<'_>) -> Emission {
        if !self.enabled(level) {
            return Emission::Skipped;
        }
        self.log_message(level, site, fmt::format(args))
    }

    /// Run an already formatted message through the pipeline.
    ///
    /// Does not apply the minimum-level gate. The returned
    /// [`Emission::Written`] carries the terminal action for `FATAL` and
    /// `PANIC`; the caller decides when to [`Terminal::enforce`] it.
    pub fn log_message(&self, level: Severity, site: CallSite, message: String) -> Emission {
        let location = site.render(self.root_marker.as_deref());
        let mut message = message;

        if level.is_rate_limited() {
            match self.limiter.should_suppress(self.limit_for(level), &location) {
                Suppression::Allow => {}
                Suppression::Announce(prefix) => message.insert_str(0, &prefix),
                Suppression::Suppress => return Emission::Suppressed,
            }
        }

        let timestamp = if self.disable_timestamps {
            None
        } else {
            Some(self.timezone.format_timestamp(self.clock.now()))
        };
        let line = self.formatter.render(&LogRecord {
            timestamp: timestamp.as_deref(),
            level,
            location: &location,
            message: &message,
        });

        self.sink.write_line(&line);
        self.counter.increment(&CounterKey {
            app_version: &self.app_version,
            level,
            location: &location,
        });

        Emission::Written {
            terminal: Terminal::for_severity(level, self.formatter.format(), &message),
        }
    }

    /// Log at `INFO`.
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, CallSite::capture(), args);
    }

    /// Log at `WARN`, subject to the warning rate limit.
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, CallSite::capture(), args);
    }

    /// Log at `ERROR`, subject to the error rate limit.
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, CallSite::capture(), args);
    }

    /// Log at `WARN` attributed to an explicit call site.
    pub fn warnf_at(&self, site: CallSite, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, site, args);
    }

    /// Log at `ERROR` attributed to an explicit call site.
    pub fn errorf_at(&self, site: CallSite, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, site, args);
    }

    /// Log at `FATAL`, then exit the process with status 255.
    ///
    /// Returns without formatting or writing anything if `FATAL` is below
    /// the minimum level.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.terminate(Severity::Fatal, CallSite::capture(), args);
    }

    /// Log at `PANIC`, then panic with the message (text format) or exit
    /// with status 255 (JSON format).
    ///
    /// Like every other severity, a gated `PANIC` is a no-op.
    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) {
        self.terminate(Severity::Panic, CallSite::capture(), args);
    }

    #[track_caller]
    fn terminate(&self, level: Severity, site: CallSite, args: fmt::Arguments<'_>) {
        if let Some(terminal) = self.log(level, site, args).into_terminal() {
            terminal.enforce()
        }
    }

    fn limit_for(&self, level: Severity) -> u64 {
        match level {
            Severity::Warn => self.warns_per_second_limit,
            Severity::Error => self.errors_per_second_limit,
            Severity::Info | Severity::Fatal | Severity::Panic => 0,
        }
    }

    /// Minimum severity that is written.
    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// Output encoding.
    pub fn format(&self) -> Format {
        self.formatter.format()
    }

    /// Standard stream the logger writes to.
    pub fn output(&self) -> OutputTarget {
        self.output
    }

    /// Zone timestamps are rendered in.
    pub fn timezone(&self) -> LogTimeZone {
        self.timezone
    }

    /// Check if timestamps are omitted.
    pub fn timestamps_disabled(&self) -> bool {
        self.disable_timestamps
    }

    /// Per-location `WARN` limit, `0` when disabled.
    pub fn warns_per_second_limit(&self) -> u64 {
        self.warns_per_second_limit
    }

    /// Per-location `ERROR` limit, `0` when disabled.
    pub fn errors_per_second_limit(&self) -> u64 {
        self.errors_per_second_limit
    }

    /// Value of the `app_version` counter label.
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Get a reference to the rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Get a reference to the counter port.
    pub fn counter(&self) -> &Arc<dyn MessageCounter> {
        &self.counter
    }

    /// Start a new rate limiting window for every location.
    pub fn reset_limiter(&self) {
        self.limiter.reset();
    }

    /// Start the periodic limiter reset on a dedicated thread.
    pub fn spawn_reset_task(&self) -> ResetHandle {
        ResetTask::new(Arc::clone(&self.limiter), self.reset).start()
    }

    /// Start the periodic limiter reset on the current tokio runtime.
    #[cfg(feature = "async")]
    pub fn spawn_reset_task_async(&self) -> AsyncResetHandle {
        ResetTask::new(Arc::clone(&self.limiter), self.reset).start_async()
    }

    /// Redirect output to `writer`, returning the previous destination.
    ///
    /// For single-threaded test setup only.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn set_output_for_tests(&self, writer: BoxedWriter) -> BoxedWriter {
        self.sink.replace(writer)
    }

    /// Restore the configured standard stream as destination.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn reset_output_for_tests(&self) {
        self.sink.replace(self.output.writer());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
