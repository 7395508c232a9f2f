//! Field visitor for rendering `tracing` events as log messages.
//!
//! The `message` field becomes the message text; every other field is
//! appended as ` key=value` in recording order:
//!
//! ```text
//! info!(port = 8080, "listening")  ->  "listening port=8080"
//! ```

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};

/// A visitor that flattens event fields into a single message line.
#[derive(Debug, Default)]
pub(crate) struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    /// Create a new field visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the visitor and return the rendered message.
    pub fn into_message(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.trim_start().to_string(),
            (false, false) => {
                let mut message = self.message;
                message.push_str(&self.fields);
                message
            }
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if field.name() == "message" {
            let _ = self.message.write_fmt(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push_field(field, format_args!("{}", value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push_field(field, format_args!("{:?}", value));
    }
}
