//! Per-call log records.

use crate::domain::severity::Severity;

/// A single log message ready to be rendered.
///
/// Records are built on the stack for every emitted message and dropped as
/// soon as the formatter has rendered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    /// Formatted timestamp, `None` when timestamps are disabled
    pub timestamp: Option<&'a str>,
    /// Severity of the message
    pub level: Severity,
    /// Rendered `file:line` of the caller
    pub location: &'a str,
    /// Message text, possibly with trailing newlines
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Message with all trailing `\n` characters removed.
    pub fn trimmed_message(&self) -> &'a str {
        self.message.trim_end_matches('\n')
    }
}
