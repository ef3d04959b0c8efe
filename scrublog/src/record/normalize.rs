//! Defensive field extraction from any record shape.
//!
//! Each field is extracted on its own and falls back to a placeholder when it
//! is missing or malformed: `""` for labels and the message, the current time
//! for the timestamp and [`LevelSource::Absent`] for the level. Nothing here
//! can fail.

use serde_json::{Map, Value};

use super::{ExceptionInfo, LevelSource, LogRecord, RawRecord, RecordTime};

/// A record with every field present.
#[derive(Clone, Debug)]
pub struct NormalizedRecord {
    /// Where the severity comes from.
    pub level: LevelSource,
    /// Emission time.
    pub timestamp: RecordTime,
    /// Unredacted message text.
    pub message: String,
    /// The message as given when it was an object or array; `message` then
    /// holds its JSON text.
    pub structured_message: Option<Value>,
    /// Module or logger name, `""` when unknown.
    pub module: String,
    /// Function name, `""` when unknown.
    pub function: String,
    /// Source line as text, `""` when unknown.
    pub line: String,
    /// Unredacted structured context; empty when absent or not a mapping.
    pub extra: Map<String, Value>,
    /// Exception being reported, if any.
    pub exception: Option<ExceptionInfo>,
}

impl NormalizedRecord {
    fn defaults() -> Self {
        Self {
            level: LevelSource::Absent,
            timestamp: RecordTime::now(),
            message: String::new(),
            structured_message: None,
            module: String::new(),
            function: String::new(),
            line: String::new(),
            extra: Map::new(),
            exception: None,
        }
    }
}

/// Extracts every field of `record`, substituting defaults as needed.
pub fn normalize(record: &RawRecord) -> NormalizedRecord {
    let normalized = match record {
        RawRecord::Structured(record) => from_structured(record),
        RawRecord::Mapping(map) => from_mapping(map),
        RawRecord::Invalid(value) => NormalizedRecord {
            message: match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            ..NormalizedRecord::defaults()
        },
        RawRecord::Absent => NormalizedRecord::defaults(),
    };
    NormalizedRecord {
        structured_message: record.structured_message().cloned(),
        ..normalized
    }
}

fn from_structured(record: &LogRecord) -> NormalizedRecord {
    NormalizedRecord {
        level: record.level.clone(),
        timestamp: record.time.clone().unwrap_or_else(RecordTime::now),
        message: record.message.clone().unwrap_or_default(),
        structured_message: None,
        module: record.module.clone().unwrap_or_default(),
        function: record.function.clone().unwrap_or_default(),
        line: record.line.map(|line| line.to_string()).unwrap_or_default(),
        extra: record.extra.clone(),
        exception: record.exception.clone(),
    }
}

fn from_mapping(map: &Map<String, Value>) -> NormalizedRecord {
    NormalizedRecord {
        level: map
            .get("level")
            .map_or(LevelSource::Absent, LevelSource::from_json),
        timestamp: map
            .get("time")
            .and_then(RecordTime::from_json)
            .unwrap_or_else(RecordTime::now),
        message: match map.get("message") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
        structured_message: None,
        module: label(map, &["name", "module"]),
        function: label(map, &["function"]),
        line: label(map, &["line"]),
        extra: match map.get("extra") {
            Some(Value::Object(extra)) => extra.clone(),
            _ => Map::new(),
        },
        exception: map.get("exception").and_then(ExceptionInfo::from_json),
    }
}

/// First of `keys` holding a string, number or boolean, as text.
fn label(map: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match map.get(*key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(value @ (Value::Number(_) | Value::Bool(_))) => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}
