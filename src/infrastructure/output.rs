//! Standard stream destinations.

use crate::application::config::ConfigError;
use crate::application::sink::BoxedWriter;
use std::fmt;
use std::io;
use std::str::FromStr;

/// Standard stream the logger writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

impl OutputTarget {
    /// Configuration name of this target.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutputTarget::Stderr => "stderr",
            OutputTarget::Stdout => "stdout",
        }
    }

    /// Open a writer for this stream.
    pub fn writer(&self) -> BoxedWriter {
        match self {
            OutputTarget::Stderr => Box::new(io::stderr()),
            OutputTarget::Stdout => Box::new(io::stdout()),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stderr" => Ok(OutputTarget::Stderr),
            "stdout" => Ok(OutputTarget::Stdout),
            other => Err(ConfigError::UnsupportedOutput(other.to_string())),
        }
    }
}
