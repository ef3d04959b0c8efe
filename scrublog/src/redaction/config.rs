//! Redaction settings.

use serde::{Deserialize, Serialize};

/// Default nesting limit for structured redaction.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for [`FieldRedactor`](super::FieldRedactor).
///
/// Every field has a default, so partial documents deserialize:
///
/// ```rust
/// use scrublog::RedactionConfig;
///
/// let config: RedactionConfig =
///     serde_json::from_str(r#"{"extra_sensitive_fields": ["session"]}"#).unwrap();
/// assert_eq!(config.max_depth, scrublog::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Maximum nesting of mappings and sequences before redaction gives up.
    pub max_depth: usize,

    /// Key fragments treated as sensitive in addition to the built-in set.
    pub extra_sensitive_fields: Vec<String>,

    /// Also pattern-scan strings (and nested sequences) that sit directly in
    /// a sequence. Off by default: only mapping members of a sequence are
    /// walked.
    pub scan_sequence_strings: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            extra_sensitive_fields: Vec::new(),
            scan_sequence_strings: false,
        }
    }
}

impl RedactionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Adds a sensitive key fragment.
    #[must_use]
    pub fn with_sensitive_field(mut self, fragment: impl Into<String>) -> Self {
        self.extra_sensitive_fields.push(fragment.into());
        self
    }

    /// Enables or disables scanning of scalar sequence members.
    #[must_use]
    pub fn with_sequence_scanning(mut self, enabled: bool) -> Self {
        self.scan_sequence_strings = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: RedactionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RedactionConfig::default());
    }

    #[test]
    fn builder_sets_fields() {
        let config = RedactionConfig::new()
            .with_max_depth(8)
            .with_sensitive_field("session")
            .with_sequence_scanning(true);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.extra_sensitive_fields, vec!["session".to_string()]);
        assert!(config.scan_sequence_strings);
    }
}
