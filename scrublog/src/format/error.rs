//! Error types for the formatting pipeline.

use crate::redaction::RedactionError;

/// Result alias for the formatting pipeline.
pub type FormatResult<T> = Result<T, FormatError>;

/// Why a record could not be formatted normally.
///
/// None of these reach the caller of `StructuredFormatter::format`; each one
/// is turned into a fallback entry.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// There was no record to format.
    #[error("no log record was provided")]
    MissingRecord,
    /// Redacting the context or a structured message failed.
    #[error("field redaction failed: {0}")]
    Redaction(#[from] RedactionError),
    /// The entry could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The pipeline panicked.
    #[error("formatter panicked: {0}")]
    Panicked(String),
}
