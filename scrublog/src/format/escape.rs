//! Line-break escaping.
//!
//! The ingestion pipeline treats one physical line as one entry, so every
//! string that reaches the output has its `\n` and `\r` characters replaced
//! with the two-character sequences `\n` and `\r`.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Returns `true` if `text` contains a raw line break.
pub fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Replaces raw `\n`/`\r` with their escaped two-character forms.
///
/// Text without line breaks is borrowed back unchanged.
pub fn escape_line_breaks(text: &str) -> Cow<'_, str> {
    if !has_line_break(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

pub(crate) fn escape_in_place(text: &mut String) {
    if has_line_break(text) {
        *text = escape_line_breaks(text).into_owned();
    }
}

/// Escapes every string and key inside `value`.
///
/// Uses an explicit work list, so nesting depth is not limited by the stack.
pub fn escape_json_strings(value: &mut Value) {
    let mut pending = vec![value];
    while let Some(current) = pending.pop() {
        match current {
            Value::String(text) => escape_in_place(text),
            Value::Array(items) => pending.extend(items.iter_mut()),
            Value::Object(map) => {
                escape_keys(map);
                pending.extend(map.values_mut());
            }
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}

pub(crate) fn escape_map_strings(map: &mut Map<String, Value>) {
    escape_keys(map);
    for value in map.values_mut() {
        escape_json_strings(value);
    }
}

fn escape_keys(map: &mut Map<String, Value>) {
    if map.keys().any(|key| has_line_break(key)) {
        *map = std::mem::take(map)
            .into_iter()
            .map(|(key, value)| (escape_line_breaks(&key).into_owned(), value))
            .collect();
    }
}
