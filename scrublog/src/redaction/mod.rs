//! Redaction of free text and structured data.
//!
//! - **`pattern`**: [`PatternRedactor`], rule-table scrubbing of strings
//! - **`field`**: [`FieldRedactor`], key-name-based recursive redaction
//! - **`config`**: [`RedactionConfig`], limits and extra sensitive fields
//! - **`error`**: [`RedactionError`]
//!
//! Redaction is irreversible: a redacted value is dropped entirely and
//! replaced with a fixed marker.

mod config;
mod error;
mod field;
mod pattern;

use std::{borrow::Cow, sync::LazyLock};

use serde_json::{Map, Value};

pub use config::{DEFAULT_MAX_DEPTH, RedactionConfig};
pub use error::{RedactionError, RedactionResult};
pub use field::FieldRedactor;
pub use pattern::PatternRedactor;

static DEFAULT_FIELD_REDACTOR: LazyLock<FieldRedactor> = LazyLock::new(FieldRedactor::new);

/// Scrubs `text` with the built-in rule table.
///
/// ```rust
/// assert_eq!(
///     scrublog::filter_message("Login failed: password=Secret!23"),
///     "Login failed: password=REDACTED"
/// );
/// ```
pub fn filter_message(text: &str) -> Cow<'_, str> {
    PatternRedactor::new().filter_message(text)
}

/// Redacts `data` with the built-in field set and default limits.
///
/// ```rust
/// use serde_json::json;
///
/// let data = json!({"email": "a@b.com", "id": 7});
/// let redacted = scrublog::filter_dict(data.as_object().unwrap()).unwrap();
/// assert_eq!(serde_json::Value::Object(redacted), json!({"email": "REDACTED", "id": 7}));
/// ```
pub fn filter_dict(data: &Map<String, Value>) -> RedactionResult<Map<String, Value>> {
    DEFAULT_FIELD_REDACTOR.filter_dict(data)
}
