//! A `slog` drain that writes redacted JSON lines.
//!
//! This module exists to put [`StructuredFormatter`] behind `slog`'s `Drain`
//! API. Each record becomes a [`LogRecord`]: the message, level and source
//! location are taken from the record, and the logger's and record's
//! key/value pairs become its `extra` context, so they go through field-name
//! redaction like any other context.
//!
//! It is responsible for:
//! - Converting slog values into JSON, including nested values emitted
//!   through `serde`.
//! - Writing exactly one line per record.
//!
//! It does not buffer, rotate or otherwise manage the writer.

use std::{
    fmt::Arguments,
    io::{self, Write},
    sync::Mutex,
};

use serde_json::{Map, Number, Value as JsonValue};
use slog::{Drain, KV, Key, Level, OwnedKVList, Record, Serializer};

use crate::{
    format::{CorrelationSource, NoCorrelation, StructuredFormatter},
    record::LogRecord,
};

/// Writes every record as one redacted JSON line.
///
/// ## Example
/// ```ignore
/// use scrublog::slog::JsonLineDrain;
/// use slog::{Drain, o};
///
/// let drain = JsonLineDrain::new(std::io::stdout()).fuse();
/// let logger = slog::Logger::root(drain, o!("service" => "billing"));
/// slog::info!(logger, "charged"; "api_key" => "sk_live_123");
/// ```
#[derive(Debug)]
pub struct JsonLineDrain<W: Write, C = NoCorrelation> {
    formatter: StructuredFormatter<C>,
    writer: Mutex<W>,
}

impl<W: Write> JsonLineDrain<W> {
    /// Creates a drain with the default formatter.
    pub fn new(writer: W) -> Self {
        Self {
            formatter: StructuredFormatter::new(),
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write, C: CorrelationSource> JsonLineDrain<W, C> {
    /// Replaces the formatter, e.g. to add correlation ids.
    pub fn with_formatter<D: CorrelationSource>(
        self,
        formatter: StructuredFormatter<D>,
    ) -> JsonLineDrain<W, D> {
        JsonLineDrain {
            formatter,
            writer: self.writer,
        }
    }

    /// Consumes the drain and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn to_log_record(record: &Record<'_>, values: &OwnedKVList) -> LogRecord {
        let mut collector = ContextCollector::default();
        // Serialization of each list stops at its first failing value; the
        // pairs collected before it are kept and the record is still logged.
        let _ = values.serialize(record, &mut collector);
        let _ = record.kv().serialize(record, &mut collector);

        LogRecord::new(level_name(record.level()), record.msg().to_string())
            .with_location(record.module(), record.function(), record.line())
            .with_extras(collector.extra)
    }
}

impl<W, C> Drain for JsonLineDrain<W, C>
where
    W: Write,
    C: CorrelationSource,
{
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> io::Result<()> {
        let line = self.formatter.format(Self::to_log_record(record, values));
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Critical => "CRITICAL",
        Level::Error => "ERROR",
        Level::Warning => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Collects key/value pairs as JSON; later keys overwrite earlier ones.
#[derive(Default)]
struct ContextCollector {
    extra: Map<String, JsonValue>,
}

impl ContextCollector {
    fn insert(&mut self, key: Key, value: JsonValue) -> slog::Result {
        self.extra.insert(key.to_string(), value);
        Ok(())
    }
}

impl Serializer for ContextCollector {
    fn emit_arguments(&mut self, key: Key, val: &Arguments<'_>) -> slog::Result {
        self.insert(key, JsonValue::String(val.to_string()))
    }

    fn emit_str(&mut self, key: Key, val: &str) -> slog::Result {
        self.insert(key, JsonValue::String(val.to_string()))
    }

    fn emit_bool(&mut self, key: Key, val: bool) -> slog::Result {
        self.insert(key, JsonValue::Bool(val))
    }

    fn emit_i64(&mut self, key: Key, val: i64) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_u64(&mut self, key: Key, val: u64) -> slog::Result {
        self.insert(key, JsonValue::from(val))
    }

    fn emit_f64(&mut self, key: Key, val: f64) -> slog::Result {
        let value = Number::from_f64(val)
            .map_or_else(|| JsonValue::String(val.to_string()), JsonValue::Number);
        self.insert(key, value)
    }

    fn emit_unit(&mut self, key: Key) -> slog::Result {
        self.insert(key, JsonValue::Null)
    }

    fn emit_none(&mut self, key: Key) -> slog::Result {
        self.insert(key, JsonValue::Null)
    }

    fn emit_serde(&mut self, key: Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let value = serde_json::to_value(val.as_serde()).unwrap_or_else(|err| {
            JsonValue::String(format!("Failed to serialize value: {err}"))
        });
        self.insert(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_level() {
        assert_eq!(level_name(Level::Warning), "WARNING");
        assert_eq!(level_name(Level::Critical), "CRITICAL");
        assert_eq!(level_name(Level::Trace), "TRACE");
    }

    #[test]
    fn non_finite_floats_become_text() {
        let mut collector = ContextCollector::default();
        collector.emit_f64("ratio", f64::INFINITY).unwrap();
        collector.emit_f64("half", 0.5).unwrap();
        assert_eq!(collector.extra["ratio"], JsonValue::String("inf".into()));
        assert_eq!(collector.extra["half"], serde_json::json!(0.5));
    }

    struct Failing;

    impl slog::Value for Failing {
        fn serialize(&self, _: &Record<'_>, _: Key, _: &mut dyn Serializer) -> slog::Result {
            Err(slog::Error::Other)
        }
    }

    #[test]
    fn failing_logger_value_keeps_record_pairs() {
        static RS: slog::RecordStatic<'static> = slog::record_static!(Level::Info, "");
        let values = OwnedKVList::from(slog::o!("broken" => Failing));
        let args = format_args!("charged");
        let kv = slog::b!("attempt" => 2);
        let record = Record::new(&RS, &args, kv);
        let log_record = JsonLineDrain::<Vec<u8>>::to_log_record(&record, &values);
        assert_eq!(log_record.message.as_deref(), Some("charged"));
        assert_eq!(log_record.extra["attempt"], JsonValue::from(2));
        assert!(log_record.extra.get("broken").is_none());
    }
}
