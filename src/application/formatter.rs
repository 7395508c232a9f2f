//! Rendering of log records into output lines.
//!
//! Two encodings are supported:
//!
//! ```text
//! default: <ts>\t<LEVEL>\t<file:line>\t<message>\n
//! json:    {"ts":"<ts>","level":"<LEVEL>","caller":"<file:line>","msg":"<message>"}\n
//! ```
//!
//! The timestamp field is omitted entirely when timestamps are disabled.
//! Trailing newlines are stripped from the message before exactly one is
//! appended, so every record is one line (text messages may still contain
//! inner newlines; JSON escapes them).

use crate::application::config::ConfigError;
use crate::domain::record::LogRecord;
use std::fmt;
use std::str::FromStr;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Tab separated plain text (configured as `default`)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Configuration name of this format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Text => "default",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Key names used in JSON output.
///
/// Keys can be renamed but never reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFields {
    ts: String,
    level: String,
    caller: String,
    msg: String,
}

impl Default for JsonFields {
    fn default() -> Self {
        Self {
            ts: "ts".to_string(),
            level: "level".to_string(),
            caller: "caller".to_string(),
            msg: "msg".to_string(),
        }
    }
}

impl JsonFields {
    /// Parse a comma separated list of `old:new` renames.
    ///
    /// An empty string keeps the default keys. Supported old names are
    /// `ts`, `level`, `caller` and `msg`.
    ///
    /// ```
    /// use ratelog::JsonFields;
    ///
    /// let fields = JsonFields::parse("ts:timestamp, msg:message").unwrap();
    /// assert_eq!(fields.ts(), "timestamp");
    /// assert_eq!(fields.msg(), "message");
    /// assert_eq!(fields.level(), "level");
    /// ```
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidJsonFields` for a pair without `:`, an
    /// unknown field or an empty new name.
    pub fn parse(renames: &str) -> Result<Self, ConfigError> {
        let mut fields = Self::default();
        let invalid = |reason: String| ConfigError::InvalidJsonFields {
            value: renames.to_string(),
            reason,
        };

        for pair in renames.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (old, new) = pair
                .split_once(':')
                .ok_or_else(|| invalid(format!("missing ':' in {:?}", pair)))?;
            let (old, new) = (old.trim(), new.trim());
            if new.is_empty() {
                return Err(invalid(format!("empty new name for {:?}", old)));
            }

            let slot = match old {
                "ts" => &mut fields.ts,
                "level" => &mut fields.level,
                "caller" => &mut fields.caller,
                "msg" => &mut fields.msg,
                other => {
                    return Err(invalid(format!(
                        "unknown field {:?}; supported fields are: ts, level, caller, msg",
                        other
                    )))
                }
            };
            *slot = new.to_string();
        }

        Ok(fields)
    }

    /// Key of the timestamp field.
    pub fn ts(&self) -> &str {
        &self.ts
    }

    /// Key of the level field.
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Key of the caller field.
    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Key of the message field.
    pub fn msg(&self) -> &str {
        &self.msg
    }
}

/// Renders records in the configured encoding.
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    format: Format,
    json_fields: JsonFields,
}

impl MessageFormatter {
    /// Create a formatter.
    pub fn new(format: Format, json_fields: JsonFields) -> Self {
        Self {
            format,
            json_fields,
        }
    }

    /// Configured encoding.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Render one record as a complete line, including the trailing newline.
    pub fn render(&self, record: &LogRecord<'_>) -> String {
        match self.format {
            Format::Text => render_text(record),
            Format::Json => self.render_json(record),
        }
    }

    fn render_json(&self, record: &LogRecord<'_>) -> String {
        let message = record.trimmed_message();
        let mut line = String::with_capacity(message.len() + record.location.len() + 64);

        line.push('{');
        if let Some(ts) = record.timestamp {
            push_json_pair(&mut line, &self.json_fields.ts, ts);
            line.push(',');
        }
        push_json_pair(&mut line, &self.json_fields.level, record.level.as_str());
        line.push(',');
        push_json_pair(&mut line, &self.json_fields.caller, record.location);
        line.push(',');
        push_json_pair(&mut line, &self.json_fields.msg, message);
        line.push_str("}\n");
        line
    }
}

fn render_text(record: &LogRecord<'_>) -> String {
    let message = record.trimmed_message();
    let level = record.level.as_str();
    match record.timestamp {
        Some(ts) => format!("{}\t{}\t{}\t{}\n", ts, level, record.location, message),
        None => format!("{}\t{}\t{}\n", level, record.location, message),
    }
}

fn push_json_pair(line: &mut String, key: &str, value: &str) {
    push_json_string(line, key);
    line.push(':');
    push_json_string(line, value);
}

fn push_json_string(line: &mut String, value: &str) {
    // Serializing a plain string cannot fail
    match serde_json::to_string(value) {
        Ok(quoted) => line.push_str(&quoted),
        Err(_) => line.push_str("\"\""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::severity::Severity;

    const TS: &str = "2024-03-01T12:30:45.123Z";

    fn record<'a>(timestamp: Option<&'a str>, level: Severity, message: &'a str) -> LogRecord<'a> {
        LogRecord {
            timestamp,
            level,
            location: "src/server.rs:42",
            message,
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("default".parse::<Format>().unwrap(), Format::Text);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!(
            "JSON".parse::<Format>(),
            Err(ConfigError::UnsupportedFormat("JSON".to_string()))
        );
        assert_eq!(Format::Text.to_string(), "default");
    }

    #[test]
    fn test_text_with_timestamp() {
        let formatter = MessageFormatter::default();
        let line = formatter.render(&record(Some(TS), Severity::Info, "started on port 8080"));
        assert_eq!(
            line,
            "2024-03-01T12:30:45.123Z\tINFO\tsrc/server.rs:42\tstarted on port 8080\n"
        );
    }

    #[test]
    fn test_text_without_timestamp() {
        let formatter = MessageFormatter::default();
        let line = formatter.render(&record(None, Severity::Error, "boom"));
        assert_eq!(line, "ERROR\tsrc/server.rs:42\tboom\n");
    }

    #[test]
    fn test_json_with_timestamp() {
        let formatter = MessageFormatter::new(Format::Json, JsonFields::default());
        let line = formatter.render(&record(Some(TS), Severity::Warn, "retry 3"));
        assert_eq!(
            line,
            "{\"ts\":\"2024-03-01T12:30:45.123Z\",\"level\":\"WARN\",\"caller\":\"src/server.rs:42\",\"msg\":\"retry 3\"}\n"
        );
    }

    #[test]
    fn test_json_without_timestamp() {
        let formatter = MessageFormatter::new(Format::Json, JsonFields::default());
        let line = formatter.render(&record(None, Severity::Warn, "retry 3"));
        assert_eq!(
            line,
            "{\"level\":\"WARN\",\"caller\":\"src/server.rs:42\",\"msg\":\"retry 3\"}\n"
        );
    }

    #[test]
    fn test_trailing_newlines_collapse_to_one() {
        let text = MessageFormatter::default();
        assert_eq!(
            text.render(&record(None, Severity::Info, "done\n\n\n")),
            "INFO\tsrc/server.rs:42\tdone\n"
        );

        let json = MessageFormatter::new(Format::Json, JsonFields::default());
        let line = json.render(&record(None, Severity::Info, "done\n\n"));
        assert!(line.ends_with("\"msg\":\"done\"}\n"));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_json_escapes_quotes_and_control_characters() {
        let formatter = MessageFormatter::new(Format::Json, JsonFields::default());
        let message = "say \"hi\"\tback\\slash\u{1}\nnext line ünïcödé ✓";
        let line = formatter.render(&record(None, Severity::Error, message));

        // Single line, valid JSON, message round-trips
        assert_eq!(line.matches('\n').count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["msg"], message);
        assert_eq!(parsed["level"], "ERROR");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let formatter = MessageFormatter::new(Format::Json, JsonFields::default());
        let rec = record(Some(TS), Severity::Info, "same");
        assert_eq!(formatter.render(&rec), formatter.render(&rec));
    }

    #[test]
    fn test_renamed_json_fields_keep_order() {
        let fields = JsonFields::parse("ts:timestamp,level:severity,msg:message").unwrap();
        let formatter = MessageFormatter::new(Format::Json, fields);
        let line = formatter.render(&record(Some(TS), Severity::Info, "x"));
        assert_eq!(
            line,
            "{\"timestamp\":\"2024-03-01T12:30:45.123Z\",\"severity\":\"INFO\",\"caller\":\"src/server.rs:42\",\"message\":\"x\"}\n"
        );
    }

    #[test]
    fn test_json_fields_parse_errors() {
        assert!(matches!(
            JsonFields::parse("ts"),
            Err(ConfigError::InvalidJsonFields { .. })
        ));
        assert!(matches!(
            JsonFields::parse("time:t"),
            Err(ConfigError::InvalidJsonFields { .. })
        ));
        assert!(matches!(
            JsonFields::parse("msg:"),
            Err(ConfigError::InvalidJsonFields { .. })
        ));
        assert_eq!(JsonFields::parse("").unwrap(), JsonFields::default());
        assert_eq!(JsonFields::parse(" , ").unwrap(), JsonFields::default());
    }
}
