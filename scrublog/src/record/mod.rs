//! Log records as they arrive at the formatter.
//!
//! Sources hand over records in several shapes. [`RawRecord`] names each
//! shape explicitly, and [`normalize`] turns any of them into a
//! [`NormalizedRecord`] where every field has a safe default.

mod exception;
mod level;
mod normalize;
mod timestamp;

use serde::Serialize;
use serde_json::{Map, Value};

pub use exception::{
    ExceptionInfo, Frame, TracebackError, TracebackHandle, TracebackSource, frames_from_json,
};
pub use level::{LevelInfo, LevelSource};
pub use normalize::{NormalizedRecord, normalize};
pub use timestamp::RecordTime;

/// A typed log record built by Rust callers.
#[derive(Clone, Debug, Default)]
pub struct LogRecord {
    /// Level the record was emitted at.
    pub level: LevelSource,
    /// Human-readable message.
    pub message: Option<String>,
    /// Emission time.
    pub time: Option<RecordTime>,
    /// Module or logger name.
    pub module: Option<String>,
    /// Function the record was emitted from.
    pub function: Option<String>,
    /// Source line.
    pub line: Option<u32>,
    /// Structured context.
    pub extra: Map<String, Value>,
    /// Exception being reported, if any.
    pub exception: Option<ExceptionInfo>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(level: impl Into<LevelSource>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: Some(message.into()),
            time: Some(RecordTime::now()),
            ..Self::default()
        }
    }

    /// Builder: set the emission time.
    #[must_use]
    pub fn with_time(mut self, time: impl Into<RecordTime>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Builder: set module, function and line.
    #[must_use]
    pub fn with_location(
        mut self,
        module: impl Into<String>,
        function: impl Into<String>,
        line: u32,
    ) -> Self {
        self.module = Some(module.into());
        self.function = Some(function.into());
        self.line = Some(line);
        self
    }

    /// Builder: add a context field.
    ///
    /// Values that cannot be represented as JSON are stored as their
    /// serialization error text.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|err| Value::String(format!("unserializable value: {err}")));
        self.extra.insert(key.into(), value);
        self
    }

    /// Builder: add several context fields.
    #[must_use]
    pub fn with_extras(mut self, extra: Map<String, Value>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// Builder: attach an exception.
    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}

/// A record in whichever shape the source produced it.
#[derive(Clone, Debug, Default)]
pub enum RawRecord {
    /// A typed record.
    Structured(LogRecord),
    /// A JSON mapping with best-effort keys `level`, `message`, `time`,
    /// `name`, `function`, `line`, `exception` and `extra`.
    Mapping(Map<String, Value>),
    /// A value that is not a mapping.
    Invalid(Value),
    /// No record at all.
    #[default]
    Absent,
}

impl RawRecord {
    /// The original message text, extracted without any fallible step.
    ///
    /// Nothing is redacted here; this is used to describe a record the
    /// formatter could not process.
    pub fn best_effort_message(&self) -> String {
        match self {
            Self::Structured(record) => record.message.clone().unwrap_or_default(),
            Self::Mapping(map) => match map.get("message") {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            },
            Self::Invalid(Value::String(text)) => text.clone(),
            Self::Invalid(value) => value.to_string(),
            Self::Absent => String::new(),
        }
    }

    /// The message when it is an object or array rather than text.
    ///
    /// Such a message needs field-name redaction before it is rendered; a
    /// record that is itself not a mapping counts as its own message.
    pub fn structured_message(&self) -> Option<&Value> {
        let message = match self {
            Self::Mapping(map) => map.get("message")?,
            Self::Invalid(value) => value,
            Self::Structured(_) | Self::Absent => return None,
        };
        (message.is_object() || message.is_array()).then_some(message)
    }
}

impl From<LogRecord> for RawRecord {
    fn from(record: LogRecord) -> Self {
        Self::Structured(record)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Object(map) => Self::Mapping(map),
            other => Self::Invalid(other),
        }
    }
}

impl<T: Into<RawRecord>> From<Option<T>> for RawRecord {
    fn from(record: Option<T>) -> Self {
        record.map_or(Self::Absent, Into::into)
    }
}
