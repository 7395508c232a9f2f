//! Logger configuration values and their validation errors.
//!
//! [`LoggerConfig`] carries the raw, string-typed values a host application
//! reads from its flags or config files. They are validated once, when the
//! logger is built; any invalid value is a [`ConfigError`] and the logger is
//! never created.

use serde::Deserialize;
use std::time::Duration;

/// Error returned when a configuration value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Output format is neither `default` nor `json`
    #[error("unsupported log format {0:?}; supported values are: default, json")]
    UnsupportedFormat(String),
    /// Output destination is neither `stderr` nor `stdout`
    #[error("unsupported log output {0:?}; supported values are: stderr, stdout")]
    UnsupportedOutput(String),
    /// Timezone name could not be resolved
    #[error("cannot load timezone {name:?}: {reason}")]
    InvalidTimezone {
        /// Configured timezone name
        name: String,
        /// Why it was rejected
        reason: String,
    },
    /// Minimum level is not a known severity
    #[error(transparent)]
    InvalidLevel(#[from] crate::domain::severity::ParseSeverityError),
    /// JSON field renames are malformed
    #[error("invalid JSON field renames {value:?}: {reason}")]
    InvalidJsonFields {
        /// Configured rename list
        value: String,
        /// Why it was rejected
        reason: String,
    },
    /// Limiter reset interval must be greater than zero
    #[error("rate limiter reset interval must be greater than 0")]
    ZeroResetInterval,
}

/// Raw logger configuration.
///
/// Defaults match a logger that writes plain text with UTC timestamps to
/// stderr, logs everything from `INFO` up and never rate limits.
///
/// ```
/// let config: ratelog::LoggerConfig = serde_json::from_str(
///     r#"{"format": "json", "warns_per_second_limit": 10}"#,
/// ).unwrap();
///
/// assert_eq!(config.format, "json");
/// assert_eq!(config.output, "stderr");
/// assert_eq!(config.warns_per_second_limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// `default` (tab separated text) or `json`
    pub format: String,
    /// `stderr` or `stdout`
    pub output: String,
    /// IANA timezone name, `UTC` or `Local`
    pub timezone: String,
    /// Omit timestamps from every line
    pub disable_timestamps: bool,
    /// Minimum severity: `INFO`, `WARN`, `ERROR`, `FATAL` or `PANIC`
    pub level: String,
    /// Comma separated `old:new` JSON key renames, e.g. `ts:timestamp,msg:message`
    pub json_fields: String,
    /// Per-location, per-second limit on `WARN` messages; 0 disables it
    pub warns_per_second_limit: u64,
    /// Per-location, per-second limit on `ERROR` messages; 0 disables it
    pub errors_per_second_limit: u64,
    /// Path segment stripped (with everything before it) from caller file names
    pub root_marker: Option<String>,
    /// Value of the `app_version` counter label
    pub app_version: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: "default".to_string(),
            output: "stderr".to_string(),
            timezone: "UTC".to_string(),
            disable_timestamps: false,
            level: "INFO".to_string(),
            json_fields: String::new(),
            warns_per_second_limit: 0,
            errors_per_second_limit: 0,
            root_marker: None,
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

/// Counter label used when the application does not supply a version.
pub const DEFAULT_APP_VERSION: &str = "unknown";

/// Default length of a rate limiting window.
pub const DEFAULT_RESET_INTERVAL: Duration = Duration::from_secs(1);

/// Validated rate limiter reset settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfig {
    /// Time between wholesale counter resets
    pub interval: Duration,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RESET_INTERVAL,
        }
    }
}

impl ResetConfig {
    /// Create a reset config with the given window length.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroResetInterval` if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroResetInterval);
        }
        Ok(Self { interval })
    }
}
