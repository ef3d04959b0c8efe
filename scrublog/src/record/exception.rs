//! Exception information attached to a record.

use std::{backtrace::Backtrace, fmt, sync::Arc};

use serde_json::{Map, Value};

/// One entry of a stack trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Source file.
    pub filename: String,
    /// Line number within `filename`.
    pub lineno: u32,
    /// Enclosing function.
    pub function: String,
    /// Source excerpt at `lineno`, if available.
    pub source: Option<String>,
}

impl Frame {
    /// Creates a frame without a source excerpt.
    pub fn new(filename: impl Into<String>, lineno: u32, function: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            lineno,
            function: function.into(),
            source: None,
        }
    }

    /// Attaches a source excerpt.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Why a traceback could not be turned into frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TracebackError {
    /// The traceback value is not a list of frames.
    #[error("expected a list of frames, found {found}")]
    NotFrameList {
        /// JSON type that was found instead.
        found: &'static str,
    },
    /// A list entry is not a mapping.
    #[error("frame {index} is not a mapping")]
    FrameNotMapping {
        /// Position of the offending entry.
        index: usize,
    },
    /// A caller-provided source failed.
    #[error("{0}")]
    Source(String),
    /// A caller-provided source panicked.
    #[error("traceback source panicked: {0}")]
    Panicked(String),
}

/// Supplies frames on demand, e.g. from a foreign runtime.
///
/// Implementations may fail or even panic; the traceback serializer turns
/// both into a descriptive string.
pub trait TracebackSource: fmt::Debug + Send + Sync {
    /// Produces the frames, outermost first.
    fn frames(&self) -> Result<Vec<Frame>, TracebackError>;
}

/// Handle to the stack trace of an exception.
#[derive(Clone, Debug)]
pub enum TracebackHandle {
    /// Frames, outermost first.
    Frames(Vec<Frame>),
    /// A trace that was already rendered to text.
    Text(String),
    /// Unvalidated frame data, checked when rendered.
    Json(Value),
    /// A caller-provided source.
    Source(Arc<dyn TracebackSource>),
}

impl TracebackHandle {
    /// Classifies a JSON value; `null` means no traceback.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self::Text(text.clone())),
            other => Some(Self::Json(other.clone())),
        }
    }
}

impl From<Vec<Frame>> for TracebackHandle {
    fn from(frames: Vec<Frame>) -> Self {
        Self::Frames(frames)
    }
}

/// Parses frame data of the form `[{"filename", "lineno", "function", "source"}, ...]`.
///
/// `file`, `name` and `line` are accepted as aliases for `filename`,
/// `function` and `source`. Missing members default to empty values.
pub fn frames_from_json(value: &Value) -> Result<Vec<Frame>, TracebackError> {
    let Value::Array(items) = value else {
        return Err(TracebackError::NotFrameList {
            found: json_type(value),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(frame_from_map(map)),
            _ => Err(TracebackError::FrameNotMapping { index }),
        })
        .collect()
}

fn frame_from_map(map: &Map<String, Value>) -> Frame {
    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    };
    let lineno = match map.get("lineno") {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Frame {
        filename: text(&["filename", "file"]).unwrap_or_default(),
        lineno: lineno.unwrap_or_default(),
        function: text(&["function", "name"]).unwrap_or_default(),
        source: text(&["source", "line"]),
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The exception part of a record: `{type, value, traceback}`.
#[derive(Clone, Debug, Default)]
pub struct ExceptionInfo {
    /// Exception type name, e.g. `ValueError`.
    pub type_name: Option<String>,
    /// Exception message.
    pub value: Option<String>,
    /// Stack trace handle.
    pub traceback: Option<TracebackHandle>,
}

impl ExceptionInfo {
    /// Creates exception info from a type name and a message.
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            value: Some(value.into()),
            traceback: None,
        }
    }

    /// Describes a Rust error: its short type name and its `Display` text.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self {
            type_name: Some(short_type_name(std::any::type_name::<E>()).to_string()),
            value: Some(err.to_string()),
            traceback: None,
        }
    }

    /// Attaches a traceback.
    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<TracebackHandle>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// Attaches a captured backtrace; disabled or unsupported backtraces are ignored.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        if matches!(
            backtrace.status(),
            std::backtrace::BacktraceStatus::Captured
        ) {
            self.traceback = Some(TracebackHandle::Text(backtrace.to_string()));
        }
        self
    }

    /// Reads `{"type", "value", "traceback"}`; a bare string is the value.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(Self {
                type_name: map.get("type").and_then(scalar_text),
                value: map.get("value").and_then(scalar_text),
                traceback: map.get("traceback").and_then(TracebackHandle::from_json),
            }),
            other => Some(Self {
                type_name: None,
                value: scalar_text(other),
                traceback: None,
            }),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
