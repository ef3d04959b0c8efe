//! Redaction policy: what counts as sensitive and what it is replaced with.
//!
//! This module provides:
//!
//! - **Rules** (`rules`): the ordered, case-insensitive regex table applied to
//!   free text.
//! - **Fields** (`fields`): the [`SensitiveFieldSet`] used to match structured
//!   keys by name.
//! - **Text policies** (`text`): the [`TextRedactionPolicy`] strategies that
//!   rewrite a single match, plus the [`REDACTED_PLACEHOLDER`] marker.
//!
//! # Example
//!
//! ```rust
//! use scrublog::{SensitiveFieldSet, redaction_rules};
//!
//! assert!(SensitiveFieldSet::builtin().is_sensitive("Api-Key"));
//! assert!(!redaction_rules().is_empty());
//! ```

pub mod fields;
pub mod rules;
pub mod text;

pub use fields::{SENSITIVE_FIELDS, SensitiveFieldSet};
pub use rules::{RedactionRule, redaction_rules};
pub use text::{EMAIL_LOCAL_MASK, REDACTED_PLACEHOLDER, TextRedactionPolicy};
