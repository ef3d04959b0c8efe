//! Key-name-based recursive redaction of structured data.

use serde_json::{Map, Value};

use super::{
    config::{DEFAULT_MAX_DEPTH, RedactionConfig},
    error::{RedactionError, RedactionResult},
    pattern::PatternRedactor,
};
use crate::policy::{REDACTED_PLACEHOLDER, SensitiveFieldSet};

/// Walks JSON mappings and redacts values by key name.
///
/// - A value whose key is sensitive is replaced whole with `"REDACTED"`,
///   whatever its type or contents.
/// - Mapping values are walked recursively.
/// - In sequences only mapping members are walked; strings directly inside a
///   sequence are left alone unless
///   [`RedactionConfig::scan_sequence_strings`] is set.
/// - Other strings go through the [`PatternRedactor`]; other scalars are kept.
///
/// The input is never modified: every call returns a new structure.
#[derive(Clone, Debug)]
pub struct FieldRedactor {
    fields: SensitiveFieldSet,
    patterns: PatternRedactor,
    max_depth: usize,
    scan_sequence_strings: bool,
}

impl FieldRedactor {
    /// Creates a redactor with the built-in field set and default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: SensitiveFieldSet::builtin(),
            patterns: PatternRedactor::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            scan_sequence_strings: false,
        }
    }

    /// Creates a redactor from configuration.
    #[must_use]
    pub fn from_config(config: &RedactionConfig) -> Self {
        Self {
            fields: SensitiveFieldSet::with_extra(&config.extra_sensitive_fields),
            patterns: PatternRedactor::new(),
            max_depth: config.max_depth,
            scan_sequence_strings: config.scan_sequence_strings,
        }
    }

    /// The key-name set in use.
    pub fn fields(&self) -> &SensitiveFieldSet {
        &self.fields
    }

    /// The free-text redactor applied to string values.
    pub fn patterns(&self) -> PatternRedactor {
        self.patterns
    }

    /// Returns a redacted copy of `data`.
    ///
    /// Fails only when nesting exceeds the configured depth.
    pub fn filter_dict(&self, data: &Map<String, Value>) -> RedactionResult<Map<String, Value>> {
        self.filter_map_at(data, 1)
    }

    /// Returns a redacted copy of any JSON value.
    ///
    /// `Null` and other non-string scalars pass through; a top-level string is
    /// pattern-scanned.
    pub fn filter_value(&self, value: &Value) -> RedactionResult<Value> {
        match value {
            Value::Object(map) => self.filter_map_at(map, 1).map(Value::Object),
            Value::Array(items) => self.filter_sequence_at(items, 1).map(Value::Array),
            other => self.filter_nested(other, 0),
        }
    }

    fn check_depth(&self, depth: usize) -> RedactionResult<()> {
        if depth > self.max_depth {
            tracing::debug!(
                target: "scrublog::redaction",
                limit = self.max_depth,
                "structure exceeds redaction depth limit"
            );
            return Err(RedactionError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn filter_map_at(
        &self,
        data: &Map<String, Value>,
        depth: usize,
    ) -> RedactionResult<Map<String, Value>> {
        self.check_depth(depth)?;
        let mut out = Map::with_capacity(data.len());
        for (key, value) in data {
            let redacted = if self.fields.is_sensitive(key) {
                Value::String(REDACTED_PLACEHOLDER.to_string())
            } else {
                self.filter_nested(value, depth)?
            };
            out.insert(key.clone(), redacted);
        }
        Ok(out)
    }

    fn filter_nested(&self, value: &Value, depth: usize) -> RedactionResult<Value> {
        match value {
            Value::Object(map) => self.filter_map_at(map, depth + 1).map(Value::Object),
            Value::Array(items) => self.filter_sequence_at(items, depth + 1).map(Value::Array),
            Value::String(text) => Ok(Value::String(
                self.patterns.filter_message(text).into_owned(),
            )),
            other => Ok(other.clone()),
        }
    }

    fn filter_sequence_at(&self, items: &[Value], depth: usize) -> RedactionResult<Vec<Value>> {
        self.check_depth(depth)?;
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => self.filter_map_at(map, depth + 1).map(Value::Object),
                Value::String(text) if self.scan_sequence_strings => Ok(Value::String(
                    self.patterns.filter_message(text).into_owned(),
                )),
                Value::Array(inner) if self.scan_sequence_strings => {
                    self.filter_sequence_at(inner, depth + 1).map(Value::Array)
                }
                other => Ok(other.clone()),
            })
            .collect()
    }
}

impl Default for FieldRedactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn replaces_whole_value_of_sensitive_key() {
        let redactor = FieldRedactor::new();
        let data = object(json!({
            "credentials": {"user": "bob"},
            "password": {"nested": [1, 2, 3]},
            "id": 7
        }));
        let out = redactor.filter_dict(&data).unwrap();
        assert_eq!(out["password"], json!("REDACTED"));
        assert_eq!(out["credentials"], json!({"user": "bob"}));
        assert_eq!(out["id"], json!(7));
    }

    #[test]
    fn scans_nested_strings() {
        let redactor = FieldRedactor::new();
        let data = object(json!({"request": {"query": "user=bob&password=pw1"}}));
        let out = redactor.filter_dict(&data).unwrap();
        assert_eq!(out["request"]["query"], json!("user=bob&password=REDACTED"));
    }

    #[test]
    fn walks_mappings_inside_sequences_only() {
        let redactor = FieldRedactor::new();
        let data = object(json!({
            "items": [{"token": "abc"}, "password=pw1", 3]
        }));
        let out = redactor.filter_dict(&data).unwrap();
        assert_eq!(out["items"], json!([{"token": "REDACTED"}, "password=pw1", 3]));
    }

    #[test]
    fn sequence_scanning_is_opt_in() {
        let config = RedactionConfig::new().with_sequence_scanning(true);
        let redactor = FieldRedactor::from_config(&config);
        let data = object(json!({"items": ["password=pw1", ["token=t"]]}));
        let out = redactor.filter_dict(&data).unwrap();
        assert_eq!(out["items"], json!(["password=REDACTED", ["token=REDACTED"]]));
    }

    #[test]
    fn extra_fields_from_config() {
        let config = RedactionConfig::new().with_sensitive_field("session");
        let redactor = FieldRedactor::from_config(&config);
        let out = redactor
            .filter_dict(&object(json!({"Session_Id": "s-1"})))
            .unwrap();
        assert_eq!(out["Session_Id"], json!("REDACTED"));
    }

    #[test]
    fn depth_limit_is_reported() {
        let redactor = FieldRedactor::from_config(&RedactionConfig::new().with_max_depth(3));
        let shallow = object(json!({"a": {"b": {"c": 1}}}));
        assert!(redactor.filter_dict(&shallow).is_ok());

        let deep = object(json!({"a": {"b": {"c": {"d": 1}}}}));
        assert_eq!(
            redactor.filter_dict(&deep),
            Err(RedactionError::DepthExceeded { limit: 3 })
        );
    }

    #[test]
    fn filter_value_passes_scalars_through() {
        let redactor = FieldRedactor::new();
        assert_eq!(redactor.filter_value(&Value::Null).unwrap(), Value::Null);
        assert_eq!(redactor.filter_value(&json!(1.5)).unwrap(), json!(1.5));
        assert_eq!(
            redactor.filter_value(&json!("token=abc")).unwrap(),
            json!("token=REDACTED")
        );
    }
}
