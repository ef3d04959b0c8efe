//! Crash-proof log redaction and single-line JSON formatting.
//!
//! This crate separates:
//! - **Policy**: what counts as sensitive (rule table, field-name fragments)
//!   and what it is replaced with.
//! - **Redaction**: scrubbing free text with the rule table and walking
//!   structured context by key name.
//! - **Records**: the shapes a log record may arrive in, normalized so every
//!   field has a safe default.
//! - **Formatting**: turning a record into one line of JSON for a cloud log
//!   ingestion pipeline.
//!
//! What this crate guarantees:
//! - [`StructuredFormatter::format`] always returns one line of valid JSON,
//!   whatever the record looks like, and never panics
//! - no emitted string contains a raw line break
//! - secrets recognized by the rule table or the field-name set never reach
//!   the output
//!
//! What it does not do:
//! - perform I/O, except through the optional sink integrations
//! - guarantee detection of secrets in shapes it does not recognize
//!
//! ```
//! use scrublog::{LogRecord, StructuredFormatter};
//!
//! let formatter = StructuredFormatter::new();
//! let line = formatter.format(
//!     LogRecord::new("ERROR", "Login failed: password=Secret!23")
//!         .with_location("app.auth", "login", 42)
//!         .with_extra("user_email", "a@b.com"),
//! );
//! assert!(line.contains(r#""message":"Login failed: password=REDACTED""#));
//! assert!(!line.contains("a@b.com"));
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::new_without_default
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
pub mod format;
pub mod policy;
pub mod record;
pub mod redaction;
#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

// Re-exports from format module
pub use format::{
    Correlation, CorrelationSource, ErrorInfo, FormatError, FormatResult, FormattedLogEntry,
    Labels, NoCorrelation, Severity, StructuredFormatter, escape_line_breaks, format_exception,
    format_traceback,
};
// Re-exports from policy module
pub use policy::{
    REDACTED_PLACEHOLDER, RedactionRule, SENSITIVE_FIELDS, SensitiveFieldSet,
    TextRedactionPolicy, redaction_rules,
};
// Re-exports from record module
pub use record::{
    ExceptionInfo, Frame, LevelInfo, LevelSource, LogRecord, NormalizedRecord, RawRecord,
    RecordTime, TracebackError, TracebackHandle, TracebackSource, normalize,
};
// Re-exports from redaction module
pub use redaction::{
    DEFAULT_MAX_DEPTH, FieldRedactor, PatternRedactor, RedactionConfig, RedactionError,
    RedactionResult, filter_dict, filter_message,
};
#[cfg(feature = "slog")]
pub use self::slog::JsonLineDrain;
#[cfg(feature = "tracing")]
pub use self::tracing::JsonLineLayer;
