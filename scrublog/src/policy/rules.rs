//! The ordered rule table used to scrub free text.
//!
//! Rules are declared once, compiled lazily on first use and never mutated.
//! Every rule is case-insensitive and every message runs through all of them
//! in declaration order.
//!
//! Only the shapes listed here are caught. In particular, credentials embedded
//! in URLs (`user:pass@host`), bare JSON pairs such as `"password" "x"` and
//! card numbers that are not four groups of four digits are known gaps.
//!
//! An unquoted value runs to the next whitespace, quote or `&`, so punctuation
//! inside a secret is redacted with it. The `&` stop keeps query strings
//! (`user=bob&password=pw&next=/`) readable; an unquoted secret containing `&`
//! is therefore only redacted up to that character, which is a known gap too.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::text::TextRedactionPolicy;

/// Value of a `key=value` / `key: "value"` assignment.
///
/// Quoted values may contain spaces; an unterminated quote consumes one token.
const VALUE: &str = r#"(?P<value>"[^"]*"|'[^']*'|["'][^\s"'&]*|[^\s"'&]+)"#;

/// Separator between a key and its value.
const SEP: &str = r"(?P<sep>\s*[=:]\s*)";

/// A single `(pattern, replacement)` pair.
#[derive(Debug)]
pub struct RedactionRule {
    name: &'static str,
    pattern: Regex,
    policy: TextRedactionPolicy,
}

impl RedactionRule {
    /// Short identifier of the rule.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The compiled, case-insensitive pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// What each match is rewritten to.
    pub fn policy(&self) -> TextRedactionPolicy {
        self.policy
    }
}

struct RuleSpec {
    name: &'static str,
    pattern: String,
    policy: TextRedactionPolicy,
}

fn assignment(name: &'static str, keys: &str) -> RuleSpec {
    RuleSpec {
        name,
        pattern: format!("(?P<key>{keys}){SEP}{VALUE}"),
        policy: TextRedactionPolicy::AssignedValue,
    }
}

fn whole(name: &'static str, pattern: &str, policy: TextRedactionPolicy) -> RuleSpec {
    RuleSpec {
        name,
        pattern: pattern.to_string(),
        policy,
    }
}

fn rule_specs() -> Vec<RuleSpec> {
    vec![
        assignment("oauth_token", r"(?:access|refresh)[_-]?token"),
        assignment("api_key", r"api[_-]?key"),
        assignment("private_key", r"private[_-]?key"),
        assignment("password", r"password|passwd|pwd|pass"),
        RuleSpec {
            name: "authorization",
            pattern: format!(
                r"(?P<key>authorization)(?P<sep>\s*[=:]\s*(?:(?:bearer|basic|digest|token)\s+)?){VALUE}"
            ),
            policy: TextRedactionPolicy::AssignedValue,
        },
        whole(
            "bearer",
            r"(?P<key>bearer)(?P<sep>\s+)(?P<value>[A-Za-z0-9\-._~+/]+=*)",
            TextRedactionPolicy::AssignedValue,
        ),
        assignment("credential", r"secret|token|bearer|auth"),
        assignment("jwt", r"jwt"),
        whole(
            "jwt_literal",
            r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
            TextRedactionPolicy::Full,
        ),
        whole(
            "card_number",
            r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b",
            TextRedactionPolicy::Full,
        ),
        whole("ssn", r"\b\d{3}-\d{2}-\d{4}\b", TextRedactionPolicy::Full),
        whole(
            "email",
            r"\b[A-Za-z0-9._%+-]+@(?P<domain>[A-Za-z0-9.-]+\.[A-Za-z]{2,})\b",
            TextRedactionPolicy::EmailLocal,
        ),
    ]
}

fn compile(spec: RuleSpec) -> RedactionRule {
    let pattern = RegexBuilder::new(&spec.pattern)
        .case_insensitive(true)
        .build()
        // The table is a compile-time constant; `every_rule_compiles` covers it.
        .unwrap_or_else(|err| panic!("redaction rule `{}` is invalid: {err}", spec.name));
    RedactionRule {
        name: spec.name,
        pattern,
        policy: spec.policy,
    }
}

static REDACTION_RULES: LazyLock<Vec<RedactionRule>> =
    LazyLock::new(|| rule_specs().into_iter().map(compile).collect());

/// Returns the rule table in application order.
pub fn redaction_rules() -> &'static [RedactionRule] {
    &REDACTION_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        for spec in rule_specs() {
            assert!(
                RegexBuilder::new(&spec.pattern).build().is_ok(),
                "rule {} failed to compile",
                spec.name
            );
        }
    }

    #[test]
    fn rules_keep_declaration_order() {
        let names: Vec<_> = redaction_rules().iter().map(RedactionRule::name).collect();
        assert_eq!(names.first(), Some(&"oauth_token"));
        assert_eq!(names.last(), Some(&"email"));
        let password = names.iter().position(|n| *n == "password").unwrap();
        let credential = names.iter().position(|n| *n == "credential").unwrap();
        assert!(password < credential);
    }

    #[test]
    fn rules_are_case_insensitive() {
        let rule = redaction_rules()
            .iter()
            .find(|r| r.name() == "password")
            .unwrap();
        assert!(rule.pattern().is_match("PASSWORD=x"));
        assert!(rule.pattern().is_match("PwD: x"));
    }
}
