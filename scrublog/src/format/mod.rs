//! Single-line JSON output.
//!
//! - **`formatter`**: [`StructuredFormatter`], the record-to-line pipeline
//! - **`severity`**: [`Severity`], the level-to-wire-name table
//! - **`traceback`**: stack trace rendering for the `error` object
//! - **`escape`**: line-break escaping applied to every emitted string
//! - **`correlation`**: ambient trace, request and user ids
//! - **`entry`**: the serialized document shape
//!
//! Every line the formatter emits parses as JSON and contains no raw `\n` or
//! `\r`, not even inside decoded string values.

mod correlation;
mod entry;
mod error;
mod escape;
mod fallback;
mod formatter;
mod severity;
mod traceback;

use std::any::Any;

pub use correlation::{Correlation, CorrelationSource, NoCorrelation};
pub use entry::{ErrorInfo, FormattedLogEntry, Labels};
pub use error::{FormatError, FormatResult};
pub use escape::{escape_json_strings, escape_line_breaks, has_line_break};
pub use fallback::{FALLBACK_MESSAGE_PREFIX, WITHHELD_TEXT};
pub use formatter::StructuredFormatter;
pub use severity::{SEVERITY_TABLE, Severity};
pub use traceback::{
    TRACEBACK_ERROR_PREFIX, TRACEBACK_HEADER, format_exception, format_traceback,
    render_exception, render_frames, render_traceback,
};

/// Text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
