//! A `tracing` layer that writes redacted JSON lines.
//!
//! Each event becomes a [`LogRecord`]: the `message` field is the message,
//! the event's module path (or target) is the module, and every other field
//! is context, subject to field-name redaction like any other context.
//!
//! Events whose target starts with `scrublog::` are the crate's own
//! diagnostics and are not written, so formatting never feeds back into
//! itself.
//!
//! # Example
//!
//! ```ignore
//! use scrublog::tracing::JsonLineLayer;
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let subscriber = tracing_subscriber::registry().with(JsonLineLayer::new(std::io::stdout));
//! tracing::subscriber::set_global_default(subscriber)?;
//! tracing::info!(user_email = "a@b.com", "signed in");
//! ```

use std::{error::Error, fmt, io::Write};

use serde_json::{Map, Number, Value as JsonValue};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, fmt::MakeWriter, layer::Context};

use crate::{
    format::{CorrelationSource, NoCorrelation, StructuredFormatter},
    record::LogRecord,
};

const OWN_TARGET_PREFIX: &str = "scrublog::";

/// Formats every event as one redacted JSON line.
#[derive(Debug)]
pub struct JsonLineLayer<W, C = NoCorrelation> {
    formatter: StructuredFormatter<C>,
    make_writer: W,
}

impl<W> JsonLineLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    /// Creates a layer with the default formatter.
    pub fn new(make_writer: W) -> Self {
        Self {
            formatter: StructuredFormatter::new(),
            make_writer,
        }
    }
}

impl<W, C> JsonLineLayer<W, C>
where
    W: for<'a> MakeWriter<'a> + 'static,
    C: CorrelationSource + 'static,
{
    /// Replaces the formatter, e.g. to add correlation ids.
    pub fn with_formatter<D: CorrelationSource>(
        self,
        formatter: StructuredFormatter<D>,
    ) -> JsonLineLayer<W, D> {
        JsonLineLayer {
            formatter,
            make_writer: self.make_writer,
        }
    }

    fn to_log_record(event: &Event<'_>) -> LogRecord {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();
        let mut record =
            LogRecord::new(level_name(*metadata.level()), message).with_extras(visitor.fields);
        record.module = Some(
            metadata
                .module_path()
                .unwrap_or_else(|| metadata.target())
                .to_string(),
        );
        record.line = metadata.line();
        record
    }
}

impl<S, W, C> Layer<S> for JsonLineLayer<W, C>
where
    S: Subscriber,
    W: for<'a> MakeWriter<'a> + 'static,
    C: CorrelationSource + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OWN_TARGET_PREFIX) {
            return;
        }
        let mut line = self.formatter.format(Self::to_log_record(event));
        line.push('\n');
        let mut writer = self.make_writer.make_writer_for(metadata);
        // There is nowhere left to report a failing sink.
        let _ = writer.write_all(line.as_bytes());
    }
}

fn level_name(level: Level) -> &'static str {
    if level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Map<String, JsonValue>,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: JsonValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value)
            .map_or_else(|| JsonValue::String(value.to_string()), JsonValue::Number);
        self.insert(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, JsonValue::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, JsonValue::String(value.to_string()));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, JsonValue::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field, JsonValue::String(text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_uses_the_wire_name() {
        assert_eq!(level_name(Level::WARN), "WARNING");
        assert_eq!(level_name(Level::TRACE), "TRACE");
    }
}
