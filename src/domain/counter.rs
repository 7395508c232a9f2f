//! Identity of the emitted-messages counter.
//!
//! Every message that reaches the output increments one counter series keyed
//! by application version, severity and call site.

use crate::domain::severity::Severity;
use std::fmt::Write as _;

/// Key of one `log_messages_total` series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterKey<'a> {
    /// Version label of the running application
    pub app_version: &'a str,
    /// Severity of the emitted message
    pub level: Severity,
    /// Rendered `file:line` of the caller
    pub location: &'a str,
}

impl<'a> CounterKey<'a> {
    /// Metric name shared by all series.
    pub const METRIC_NAME: &'static str = "log_messages_total";

    /// Full series name, e.g.
    /// `log_messages_total{app_version="1.2.0", level="WARN", location="src/db.rs:40"}`.
    pub fn series_name(&self) -> String {
        let mut name = String::with_capacity(
            Self::METRIC_NAME.len() + self.app_version.len() + self.location.len() + 48,
        );
        name.push_str(Self::METRIC_NAME);
        name.push_str("{app_version=");
        push_quoted(&mut name, self.app_version);
        name.push_str(", level=");
        push_quoted(&mut name, self.level.as_str());
        name.push_str(", location=");
        push_quoted(&mut name, self.location);
        name.push('}');
        name
    }
}

fn push_quoted(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
