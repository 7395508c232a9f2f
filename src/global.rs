//! Process-wide logger.
//!
//! [`init`] installs one [`Logger`] for the lifetime of the process and starts
//! its limiter reset thread. Until then, the free functions and macros log
//! through a default logger (text to stderr, `INFO` and up, no rate limiting).

use crate::application::config::{ConfigError, LoggerConfig};
use crate::application::reset::{ResetHandle, ShutdownError};
use crate::domain::location::CallSite;
use crate::domain::severity::Severity;
use crate::infrastructure::logger::{Logger, LoggerBuilder};

use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Exit status used when the logger cannot be initialized.
pub const INIT_FAILURE_EXIT_CODE: i32 = 1;

/// Error returned when installing the process-wide logger fails.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// A configuration value is invalid
    #[error("invalid logger configuration: {0}")]
    Config(#[from] ConfigError),
    /// `init` already succeeded earlier in this process
    #[error("logger is already initialized")]
    AlreadyInitialized,
}

struct Installed {
    logger: Logger,
    reset: Mutex<Option<ResetHandle>>,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();
static FALLBACK: OnceLock<Logger> = OnceLock::new();

/// Validate `config` and install the process-wide logger.
///
/// Starts the limiter reset thread, which runs until
/// [`shutdown_reset_task`] or process exit.
///
/// # Errors
/// Returns `InitError::Config` for an invalid configuration value and
/// `InitError::AlreadyInitialized` on any call after the first success.
pub fn init(config: LoggerConfig) -> Result<&'static Logger, InitError> {
    let logger = LoggerBuilder::from_config(&config)?.build()?;
    init_with(logger)
}

/// Install an already built logger as the process-wide logger.
///
/// # Errors
/// Returns `InitError::AlreadyInitialized` on any call after the first success.
pub fn init_with(logger: Logger) -> Result<&'static Logger, InitError> {
    let installed = Installed {
        logger,
        reset: Mutex::new(None),
    };
    if INSTALLED.set(installed).is_err() {
        return Err(InitError::AlreadyInitialized);
    }
    let installed = INSTALLED.get().ok_or(InitError::AlreadyInitialized)?;

    let handle = installed.logger.spawn_reset_task();
    *installed
        .reset
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(handle);

    let logger = &installed.logger;
    tracing::debug!(
        format = %logger.format(),
        output = %logger.output(),
        timezone = %logger.timezone(),
        disable_timestamps = logger.timestamps_disabled(),
        level = %logger.min_level(),
        warns_per_second_limit = logger.warns_per_second_limit(),
        errors_per_second_limit = logger.errors_per_second_limit(),
        app_version = logger.app_version(),
        "logger initialized"
    );
    Ok(logger)
}

/// Like [`init`], but reports an invalid configuration on stderr and exits
/// the process with [`INIT_FAILURE_EXIT_CODE`].
pub fn must_init(config: LoggerConfig) -> &'static Logger {
    match init(config) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("cannot initialize logger: {}", err);
            std::process::exit(INIT_FAILURE_EXIT_CODE)
        }
    }
}

/// The process-wide logger, or the default logger before [`init`].
pub fn logger() -> &'static Logger {
    match INSTALLED.get() {
        Some(installed) => &installed.logger,
        None => FALLBACK.get_or_init(Logger::new),
    }
}

/// Returns true once [`init`] has succeeded.
pub fn is_initialized() -> bool {
    INSTALLED.get().is_some()
}

/// Stop the process-wide limiter reset thread.
///
/// Counters stop resetting afterwards. Calling this more than once, or
/// before [`init`], does nothing.
///
/// # Errors
/// Returns `ShutdownError::ThreadPanicked` if the thread panicked.
pub fn shutdown_reset_task() -> Result<(), ShutdownError> {
    let handle = INSTALLED.get().and_then(|installed| {
        installed
            .reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    });
    match handle {
        Some(handle) => handle.shutdown(),
        None => Ok(()),
    }
}

/// Log at `INFO` through the process-wide logger.
#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    logger().infof(args);
}

/// Log at `WARN` through the process-wide logger.
#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    logger().warnf(args);
}

/// Log at `ERROR` through the process-wide logger.
#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    logger().errorf(args);
}

/// Log at `FATAL` through the process-wide logger and exit.
///
/// Returns only when `FATAL` is below the configured minimum level.
#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) {
    logger().fatalf(args);
}

/// Log at `PANIC` through the process-wide logger, then panic (text format)
/// or exit (JSON format).
///
/// Returns only when `PANIC` is below the configured minimum level.
#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) {
    logger().panicf(args);
}

/// Log at `WARN` attributed to `site`.
pub fn warnf_at(site: CallSite, args: fmt::Arguments<'_>) {
    logger().warnf_at(site, args);
}

/// Log at `ERROR` attributed to `site`.
pub fn errorf_at(site: CallSite, args: fmt::Arguments<'_>) {
    logger().errorf_at(site, args);
}

/// Returns true if the process-wide logger writes messages of `level`.
pub fn enabled(level: Severity) -> bool {
    logger().enabled(level)
}

/// `ERROR` writer attributed to the caller, backed by the process-wide logger.
#[track_caller]
pub fn error_writer() -> crate::infrastructure::writer::ErrorWriter<'static> {
    crate::infrastructure::writer::ErrorWriter::new(logger())
}
