//! The level a record was emitted at, in whatever shape it arrived.

use serde_json::Value;

/// A level object that carries its own name, such as `{"name": "ERROR", "no": 40}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    /// Level name, e.g. `"WARNING"`.
    pub name: String,
    /// Numeric priority, if the source provided one.
    pub no: Option<u32>,
}

/// Source of a record's severity.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LevelSource {
    /// No level was given.
    #[default]
    Absent,
    /// A bare level name.
    Name(String),
    /// A structure carrying a level name.
    Named(LevelInfo),
    /// Something that carries no usable name.
    Unrecognized(Value),
}

impl LevelSource {
    /// Classifies a JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(name) => Self::Name(name.clone()),
            Value::Object(map) => match map.get("name") {
                Some(Value::String(name)) => Self::Named(LevelInfo {
                    name: name.clone(),
                    no: map
                        .get("no")
                        .and_then(Value::as_u64)
                        .and_then(|no| u32::try_from(no).ok()),
                }),
                _ => Self::Unrecognized(value.clone()),
            },
            other => Self::Unrecognized(other.clone()),
        }
    }

    /// The level name, when the source has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Named(info) => Some(&info.name),
            Self::Absent | Self::Unrecognized(_) => None,
        }
    }
}

impl From<&str> for LevelSource {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for LevelSource {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<LevelInfo> for LevelSource {
    fn from(info: LevelInfo) -> Self {
        Self::Named(info)
    }
}
