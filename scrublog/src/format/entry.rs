//! The emitted document.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    escape::{escape_in_place, escape_map_strings},
    severity::Severity,
};

/// Location labels, plus correlation ids when available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub module: String,
    pub function: String,
    pub line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// The `error` object of an entry. Missing parts serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub value: Option<String>,
    pub traceback: Option<String>,
}

/// One formatted log line, before serialization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedLogEntry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: String,
    pub labels: Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl FormattedLogEntry {
    /// Escapes line breaks in every string of the entry, context keys included.
    pub fn escape_line_breaks(&mut self) {
        let Self {
            severity: _,
            message,
            timestamp,
            labels,
            trace,
            context,
            error,
        } = self;
        escape_in_place(message);
        escape_in_place(timestamp);
        escape_in_place(&mut labels.module);
        escape_in_place(&mut labels.function);
        escape_in_place(&mut labels.line);
        for id in [&mut labels.request_id, &mut labels.user_id, trace]
            .into_iter()
            .flatten()
        {
            escape_in_place(id);
        }
        if let Some(context) = context {
            escape_map_strings(context);
        }
        if let Some(error) = error {
            for part in [&mut error.type_name, &mut error.value, &mut error.traceback]
                .into_iter()
                .flatten()
            {
                escape_in_place(part);
            }
        }
    }
}
