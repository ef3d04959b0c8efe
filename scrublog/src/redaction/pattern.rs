//! Regex-based scrubbing of free text.

use std::borrow::Cow;

use regex::Captures;

use crate::policy::{RedactionRule, redaction_rules};

/// Applies the static rule table to strings.
///
/// The redactor holds only a reference to the shared, immutable table, so it
/// is `Copy` and can be used from any number of threads at once.
#[derive(Clone, Copy, Debug)]
pub struct PatternRedactor {
    rules: &'static [RedactionRule],
}

impl PatternRedactor {
    /// Creates a redactor over the built-in rule table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: redaction_rules(),
        }
    }

    /// Scrubs `text`, borrowing it back unchanged when no rule matches.
    ///
    /// Empty input is returned as-is.
    pub fn filter_message<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        if text.is_empty() {
            return out;
        }
        for rule in self.rules {
            let policy = rule.policy();
            let next = match rule
                .pattern()
                .replace_all(&out, |caps: &Captures<'_>| policy.apply_to(caps))
            {
                Cow::Borrowed(_) => None,
                Cow::Owned(replaced) => Some(replaced),
            };
            if let Some(replaced) = next {
                out = Cow::Owned(replaced);
            }
        }
        out
    }

    /// Like [`filter_message`](Self::filter_message), passing `None` through.
    pub fn filter_message_opt<'a>(&self, text: Option<&'a str>) -> Option<Cow<'a, str>> {
        text.map(|text| self.filter_message(text))
    }
}

impl Default for PatternRedactor {
    fn default() -> Self {
        Self::new()
    }
}
