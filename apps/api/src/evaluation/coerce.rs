//! Coercion of loosely-typed list items into plain strings.

use serde_json::Value;

/// Keys probed, in order, when a list item arrives as an object.
const TEXT_KEYS: &[&str] = &["improved_bullet", "bad_bullet", "text", "content", "message"];

/// Reduces one list element to a plain string.
///
/// Objects yield the first non-empty value under `TEXT_KEYS`, falling back to
/// their JSON text. Other scalars render as text; empty or falsy values become "".
pub fn coerce_item(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        Value::Object(map) => TEXT_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| is_truthy(v))
            .map(render)
            .unwrap_or_else(|| item.to_string()),
        other if is_truthy(other) => render(other),
        _ => String::new(),
    }
}

/// Coerces a whole list field. Returns the strings and how many items needed conversion.
///
/// A bare string is treated as a one-item list; any other non-list shape is empty.
pub fn coerce_list(value: Option<&Value>) -> (Vec<String>, usize) {
    match value {
        Some(Value::Array(items)) => {
            let converted = items.iter().filter(|i| !i.is_string()).count();
            (items.iter().map(coerce_item).collect(), converted)
        }
        Some(Value::String(s)) if !s.is_empty() => (vec![s.clone()], 0),
        _ => (vec![], 0),
    }
}

/// Renders any value as text, strings without their quotes.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
