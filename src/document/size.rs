use serde_json::Value;

/// Rough in-memory footprint of a value. Used by the array-building
/// accumulators to enforce their per-group memory cap.
pub fn approximate_size(v: &Value) -> usize {
    match v {
        Value::Null | Value::Bool(_) => 8,
        Value::Number(_) => 16,
        Value::String(s) => 24 + s.len(),
        Value::Array(items) => 24 + items.iter().map(approximate_size).sum::<usize>(),
        Value::Object(map) => {
            24 + map
                .iter()
                .map(|(k, v)| 24 + k.len() + approximate_size(v))
                .sum::<usize>()
        }
    }
}
