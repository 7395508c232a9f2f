//! Terminal severity handling.
//!
//! `FATAL` and `PANIC` end the calling context after their line is written.
//! The logging pipeline only *describes* what must happen as a [`Terminal`]
//! value; [`Terminal::enforce`] is the one place that actually exits or
//! panics, so the pipeline itself stays testable.

use crate::application::formatter::Format;
use crate::domain::severity::Severity;

/// Exit status used by `FATAL`, and by `PANIC` in JSON mode.
pub const TERMINAL_EXIT_CODE: i32 = 255;

/// Action that ends the calling context after a terminal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Exit the process immediately with this status
    Exit {
        /// Process exit status
        code: i32,
    },
    /// Unwind with the message as panic payload
    Panic {
        /// Logged message, without trailing newlines
        message: String,
    },
}

impl Terminal {
    /// Exit with [`TERMINAL_EXIT_CODE`].
    pub fn exit() -> Self {
        Terminal::Exit {
            code: TERMINAL_EXIT_CODE,
        }
    }

    /// Action for a `PANIC` message.
    ///
    /// In JSON mode the process exits instead of unwinding so a panic
    /// backtrace never ends up in a structured log stream.
    pub fn for_panic(format: Format, message: &str) -> Self {
        match format {
            Format::Json => Self::exit(),
            Format::Text => Terminal::Panic {
                message: message.trim_end_matches('\n').to_string(),
            },
        }
    }

    /// Action for a message of `level`, `None` for non-terminal severities.
    pub fn for_severity(level: Severity, format: Format, message: &str) -> Option<Self> {
        match level {
            Severity::Fatal => Some(Self::exit()),
            Severity::Panic => Some(Self::for_panic(format, message)),
            Severity::Info | Severity::Warn | Severity::Error => None,
        }
    }

    /// Carry out the action. Never returns.
    #[track_caller]
    pub fn enforce(self) -> ! {
        match self {
            Terminal::Exit { code } => std::process::exit(code),
            Terminal::Panic { message } => std::panic::panic_any(message),
        }
    }
}
