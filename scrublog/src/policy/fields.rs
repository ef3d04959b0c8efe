//! Key-name fragments that mark a structured field as sensitive.

use std::borrow::Cow;

/// Built-in fragments, all lowercase.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "pass",
    "api_key",
    "apikey",
    "api-key",
    "secret",
    "token",
    "bearer",
    "authorization",
    "auth",
    "access_token",
    "refresh_token",
    "private_key",
    "jwt",
    "credit_card",
    "card_number",
    "ssn",
    "social_security",
    "email",
    "phone",
    "address",
];

/// An immutable set of lowercase name fragments.
///
/// A key is sensitive iff any fragment is a substring of the lowercased key,
/// so `userPassword` and `X-Api-Key` both match.
#[derive(Clone, Debug)]
pub struct SensitiveFieldSet {
    fragments: Vec<Cow<'static, str>>,
}

impl SensitiveFieldSet {
    /// The built-in set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            fragments: SENSITIVE_FIELDS.iter().copied().map(Cow::Borrowed).collect(),
        }
    }

    /// The built-in set extended with caller-supplied fragments.
    ///
    /// Fragments are lowercased; blank ones are ignored since they would match
    /// every key.
    #[must_use]
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::builtin();
        for fragment in extra {
            let fragment = fragment.as_ref().trim().to_lowercase();
            if fragment.is_empty() || set.fragments.iter().any(|f| *f == fragment) {
                continue;
            }
            set.fragments.push(Cow::Owned(fragment));
        }
        set
    }

    /// Returns `true` if `key` names sensitive data.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.fragments.iter().any(|fragment| key.contains(fragment.as_ref()))
    }

    /// Number of fragments in the set.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Always `false` for the built-in set.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl Default for SensitiveFieldSet {
    fn default() -> Self {
        Self::builtin()
    }
}
