//! The entry emitted when normal formatting fails.
//!
//! Everything here is built from fixed-shape `json!` construction, string
//! concatenation and line-break escaping, so producing the fallback cannot
//! itself fail. The original message is still scrubbed of inline secrets,
//! isolated behind its own panic guard. An object or array message also goes
//! through field-name redaction and is withheld when that fails.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    panic::{self, AssertUnwindSafe},
};

use chrono::Utc;
use serde_json::json;

use super::{FormatError, escape::escape_line_breaks};
use crate::{
    record::RawRecord,
    redaction::{FieldRedactor, PatternRedactor},
};

/// Prefix of every fallback message.
pub const FALLBACK_MESSAGE_PREFIX: &str = "Logging formatter error: ";

/// Stands in for text that could not be scrubbed.
pub const WITHHELD_TEXT: &str = "<withheld: redaction failed>";

/// Renders the fallback line for a record that could not be formatted.
pub(crate) fn fallback_line(
    err: &FormatError,
    record: &RawRecord,
    redactor: &FieldRedactor,
) -> String {
    let patterns = redactor.patterns();
    let cause = scrub(&err.to_string(), patterns);
    let original = original_message(record, redactor);
    let message = String::from(FALLBACK_MESSAGE_PREFIX) + &cause + " | Original message: " + &original;

    json!({
        "severity": "ERROR",
        "message": message,
        "timestamp": Utc::now().to_rfc3339(),
        "labels": {
            "module": "",
            "function": "",
            "line": "",
            "formatter_error": cause,
            "formatter_traceback": failure_trace(err),
        },
    })
    .to_string()
}

fn scrub(text: &str, patterns: PatternRedactor) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| {
        escape_line_breaks(&patterns.filter_message(text)).into_owned()
    }))
    .unwrap_or_else(|_| WITHHELD_TEXT.to_string())
}

fn original_message(record: &RawRecord, redactor: &FieldRedactor) -> String {
    let Some(message) = record.structured_message() else {
        return scrub(&record.best_effort_message(), redactor.patterns());
    };
    panic::catch_unwind(AssertUnwindSafe(|| redactor.filter_value(message).ok()))
        .ok()
        .flatten()
        .map_or_else(
            || WITHHELD_TEXT.to_string(),
            |redacted| scrub(&redacted.to_string(), redactor.patterns()),
        )
}

fn failure_trace(err: &FormatError) -> String {
    let backtrace = Backtrace::capture();
    let text = match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => format!("{err:?}"),
    };
    escape_line_breaks(&text).into_owned()
}
