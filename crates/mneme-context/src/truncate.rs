//! Bounded renderings of tool arguments and results for logging.

use serde_json::Value;

/// Cap `text` at `max_chars` characters.
///
/// Anything cut is replaced by a trailing ellipsis, which counts toward
/// the cap, so the output never exceeds `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars - 1).collect();
    format!("{}…", kept)
}

/// Walk a JSON value and cap every string in it at `max_chars`.
///
/// Non-string leaves pass through untouched; object keys are preserved.
#[must_use]
pub fn truncate_value(value: &Value, max_chars: usize) -> Value {
    match value {
        Value::String(text) => Value::String(truncate_chars(text, max_chars)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| truncate_value(item, max_chars))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), truncate_value(item, max_chars)))
                .collect(),
        ),
        other => other.clone(),
    }
}
