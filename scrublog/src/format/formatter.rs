//! Record to JSON line conversion.

use std::panic::{self, AssertUnwindSafe};

use super::{
    FormatError, FormatResult,
    correlation::{CorrelationSource, NoCorrelation},
    entry::{ErrorInfo, FormattedLogEntry, Labels},
    fallback::fallback_line,
    panic_message,
    severity::Severity,
    traceback::render_exception,
};
use crate::{
    record::{NormalizedRecord, RawRecord, normalize},
    redaction::{FieldRedactor, PatternRedactor, RedactionConfig},
};

/// Turns log records into single-line, redacted JSON documents.
///
/// [`format`](Self::format) never fails and never panics: whatever goes wrong
/// while building an entry is reported through a fallback entry instead.
/// The formatter holds no mutable state and can be shared across threads.
///
/// ```
/// use scrublog::StructuredFormatter;
/// use serde_json::json;
///
/// let formatter = StructuredFormatter::new();
/// let line = formatter.format(json!({
///     "level": "INFO",
///     "message": "Login failed: password=Secret!23",
///     "extra": {"email": "a@b.com", "id": 7},
/// }));
/// let entry: serde_json::Value = serde_json::from_str(&line).unwrap();
/// assert_eq!(entry["severity"], "INFO");
/// assert_eq!(entry["message"], "Login failed: password=REDACTED");
/// assert_eq!(entry["context"], json!({"email": "REDACTED", "id": 7}));
/// ```
#[derive(Clone, Debug)]
pub struct StructuredFormatter<C = NoCorrelation> {
    redactor: FieldRedactor,
    correlation: C,
}

impl StructuredFormatter {
    /// Creates a formatter with the built-in redaction settings.
    pub fn new() -> Self {
        Self::with_config(&RedactionConfig::default())
    }

    /// Creates a formatter whose context redaction follows `config`.
    pub fn with_config(config: &RedactionConfig) -> Self {
        Self {
            redactor: FieldRedactor::from_config(config),
            correlation: NoCorrelation,
        }
    }
}

impl Default for StructuredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CorrelationSource> StructuredFormatter<C> {
    /// Replaces the source of correlation ids.
    pub fn with_correlation<D: CorrelationSource>(self, correlation: D) -> StructuredFormatter<D> {
        StructuredFormatter {
            redactor: self.redactor,
            correlation,
        }
    }

    /// The redactor applied to record context.
    pub fn redactor(&self) -> &FieldRedactor {
        &self.redactor
    }

    /// Formats a record as one line of JSON, without a trailing newline.
    pub fn format(&self, record: impl Into<RawRecord>) -> String {
        self.format_record(&record.into())
    }

    /// Formats a record as one line of JSON, falling back to an error entry.
    pub fn format_record(&self, record: &RawRecord) -> String {
        let err = match panic::catch_unwind(AssertUnwindSafe(|| self.try_format(record))) {
            Ok(Ok(line)) => return line,
            Ok(Err(err)) => err,
            Err(payload) => FormatError::Panicked(panic_message(&*payload)),
        };
        let line = fallback_line(&err, record, &self.redactor);
        tracing::warn!(
            target: "scrublog::formatter",
            error = %err,
            "log record could not be formatted; emitted fallback entry"
        );
        line
    }

    /// Formats a record, reporting failures instead of falling back.
    pub fn try_format(&self, record: &RawRecord) -> FormatResult<String> {
        let entry = self.build_entry(record)?;
        Ok(serde_json::to_string(&entry)?)
    }

    /// Builds the redacted and escaped entry for a record.
    pub fn build_entry(&self, record: &RawRecord) -> FormatResult<FormattedLogEntry> {
        if matches!(record, RawRecord::Absent) {
            return Err(FormatError::MissingRecord);
        }
        let NormalizedRecord {
            level,
            timestamp,
            message,
            structured_message,
            module,
            function,
            line,
            extra,
            exception,
        } = normalize(record);
        let patterns = self.patterns();
        let ids = self.correlation.correlation();

        let message = match structured_message {
            Some(value) => self.redactor.filter_value(&value)?.to_string(),
            None => message,
        };
        let context = if extra.is_empty() {
            None
        } else {
            Some(self.redactor.filter_dict(&extra)?)
        };
        let error = exception.map(|info| ErrorInfo {
            traceback: render_exception(&info).map(|text| scrub(patterns, &text)),
            value: info.value.as_deref().map(|value| scrub(patterns, value)),
            type_name: info.type_name,
        });

        let mut entry = FormattedLogEntry {
            severity: Severity::from_level(&level),
            message: scrub(patterns, &message),
            timestamp: timestamp.to_iso8601(),
            labels: Labels {
                module,
                function,
                line,
                request_id: ids.request().map(str::to_string),
                user_id: ids.user().map(str::to_string),
            },
            trace: ids.trace_id().map(str::to_string),
            context,
            error,
        };
        entry.escape_line_breaks();
        Ok(entry)
    }

    fn patterns(&self) -> PatternRedactor {
        self.redactor.patterns()
    }
}

fn scrub(patterns: PatternRedactor, text: &str) -> String {
    patterns.filter_message(text).into_owned()
}
