//! Output severity vocabulary.

use std::fmt;

use serde::Serialize;

use crate::record::LevelSource;

/// Severity understood by the downstream ingestion pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Level unknown.
    Default,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// Source level name to output severity. Names not listed map to
/// [`Severity::Default`].
pub const SEVERITY_TABLE: &[(&str, Severity)] = &[
    ("TRACE", Severity::Debug),
    ("DEBUG", Severity::Debug),
    ("INFO", Severity::Info),
    ("SUCCESS", Severity::Info),
    ("WARNING", Severity::Warning),
    ("ERROR", Severity::Error),
    ("CRITICAL", Severity::Critical),
];

impl Severity {
    /// Looks up a source level name.
    ///
    /// Surrounding whitespace and ASCII case are ignored.
    pub fn from_level_name(name: &str) -> Self {
        let name = name.trim();
        SEVERITY_TABLE
            .iter()
            .find(|(level, _)| level.eq_ignore_ascii_case(name))
            .map_or(Self::Default, |(_, severity)| *severity)
    }

    /// Maps any level source; sources without a name map to [`Severity::Default`].
    pub fn from_level(source: &LevelSource) -> Self {
        source.name().map_or(Self::Default, Self::from_level_name)
    }

    /// The wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_every_known_level() {
        let expected = [
            ("TRACE", "DEBUG"),
            ("DEBUG", "DEBUG"),
            ("INFO", "INFO"),
            ("SUCCESS", "INFO"),
            ("WARNING", "WARNING"),
            ("ERROR", "ERROR"),
            ("CRITICAL", "CRITICAL"),
            ("garbage", "DEFAULT"),
            ("", "DEFAULT"),
        ];
        for (level, severity) in expected {
            assert_eq!(Severity::from_level_name(level).as_str(), severity, "{level}");
        }
    }

    #[test]
    fn ignores_case_and_whitespace() {
        assert_eq!(Severity::from_level_name(" warning "), Severity::Warning);
    }

    #[test]
    fn nameless_sources_are_default() {
        assert_eq!(Severity::from_level(&LevelSource::Absent), Severity::Default);
        assert_eq!(
            Severity::from_level(&LevelSource::Unrecognized(json!(3))),
            Severity::Default
        );
    }

    #[test]
    fn serializes_as_wire_name() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), r#""WARNING""#);
        assert_eq!(serde_json::to_string(&Severity::Default).unwrap(), r#""DEFAULT""#);
    }
}
