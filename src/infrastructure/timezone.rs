//! Timezone resolution and timestamp rendering.
//!
//! Timestamps are rendered with millisecond precision in the configured zone,
//! followed by `Z` for a zero offset or `+hhmm`/`-hhmm` otherwise:
//!
//! ```text
//! 2024-03-01T12:30:45.123Z
//! 2024-03-01T07:30:45.123-0500
//! ```

use crate::application::config::ConfigError;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Zone timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogTimeZone {
    /// Coordinated universal time
    #[default]
    Utc,
    /// The host's local offset
    Local,
    /// A named IANA zone
    Named(Tz),
}

impl LogTimeZone {
    /// Resolve a configured timezone name.
    ///
    /// `UTC` and the empty string select UTC, `Local` selects the host's
    /// offset and anything else must be an IANA zone name.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidTimezone` for an unknown zone name.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        match name {
            "" | "UTC" => Ok(LogTimeZone::Utc),
            "Local" => Ok(LogTimeZone::Local),
            other => other
                .parse::<Tz>()
                .map(LogTimeZone::Named)
                .map_err(|err| ConfigError::InvalidTimezone {
                    name: other.to_string(),
                    reason: err.to_string(),
                }),
        }
    }

    /// Render `now` in this zone.
    pub fn format_timestamp(&self, now: DateTime<Utc>) -> String {
        let local = match self {
            LogTimeZone::Utc => now.fixed_offset(),
            LogTimeZone::Local => now.with_timezone(&chrono::Local).fixed_offset(),
            LogTimeZone::Named(tz) => now.with_timezone(tz).fixed_offset(),
        };
        render(&local)
    }
}

fn render(ts: &DateTime<FixedOffset>) -> String {
    let mut out = String::with_capacity(28);
    let _ = write!(out, "{}", ts.format("%Y-%m-%dT%H:%M:%S%.3f"));
    if ts.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        let _ = write!(out, "{}", ts.format("%z"));
    }
    out
}

impl FromStr for LogTimeZone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl fmt::Display for LogTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogTimeZone::Utc => f.write_str("UTC"),
            LogTimeZone::Local => f.write_str("Local"),
            LogTimeZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}
