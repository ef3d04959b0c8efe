//! Text replacement strategies used by the redaction rules.
//!
//! A strategy decides what a single regex match turns into. Strategies are
//! pure string transformations: they never look at anything but the capture
//! groups of the match they are given.

use regex::Captures;

/// Marker written in place of every redacted value.
pub const REDACTED_PLACEHOLDER: &str = "REDACTED";

/// Mask substituted for the local part of an email address.
pub const EMAIL_LOCAL_MASK: &str = "***";

/// How a matched span is rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRedactionPolicy {
    /// Replace the entire match with [`REDACTED_PLACEHOLDER`].
    Full,
    /// Keep the `key` and `sep` groups and replace the `value` group.
    ///
    /// A quote that opens the value is kept, and so is the matching closing
    /// quote, so `key: "value"` becomes `key: "REDACTED"`.
    AssignedValue,
    /// Replace the local part of an email with [`EMAIL_LOCAL_MASK`] and keep
    /// the `domain` group.
    EmailLocal,
}

impl TextRedactionPolicy {
    /// Renders the replacement for one match.
    ///
    /// This method is total; a missing capture group renders as empty text.
    #[must_use]
    pub fn apply_to(&self, caps: &Captures<'_>) -> String {
        match self {
            TextRedactionPolicy::Full => REDACTED_PLACEHOLDER.to_string(),
            TextRedactionPolicy::AssignedValue => {
                let key = group(caps, "key");
                let sep = group(caps, "sep");
                let value = group(caps, "value");
                format!("{key}{sep}{}", quoted_placeholder(value))
            }
            TextRedactionPolicy::EmailLocal => {
                format!("{EMAIL_LOCAL_MASK}@{}", group(caps, "domain"))
            }
        }
    }
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn quoted_placeholder(value: &str) -> String {
    let Some(open) = value.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return REDACTED_PLACEHOLDER.to_string();
    };
    if value.len() >= 2 && value.ends_with(open) {
        format!("{open}{REDACTED_PLACEHOLDER}{open}")
    } else {
        format!("{open}{REDACTED_PLACEHOLDER}")
    }
}
