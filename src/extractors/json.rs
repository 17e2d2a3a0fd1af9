//! Recursive string-value walk over JSON documents

use serde_json::Value;

/// Key whose subtree is a type annotation rather than a variable name
pub const FORMAT_KEY: &str = "__format";

/// Collects every string leaf of `value` in document order, skipping any
/// [`FORMAT_KEY`] entry at every depth.
pub fn collect_string_values(value: &Value) -> Vec<String> {
    let mut values = Vec::new();
    walk(value, &mut values);
    values
}

fn walk(value: &Value, values: &mut Vec<String>) {
    match value {
        Value::String(s) => values.push(s.clone()),
        Value::Object(map) => {
            for (key, child) in map {
                if key != FORMAT_KEY {
                    walk(child, values);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, values);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
