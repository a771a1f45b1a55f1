//! Small builders for the JSON Schema documents sent as output formats.

use serde_json::{json, Map, Value};

/// Object with every listed property required and nothing else allowed.
pub fn object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

pub fn string() -> Value {
    json!({"type": "string"})
}

pub fn integer() -> Value {
    json!({"type": "integer"})
}

pub fn integer_between(min: i64, max: i64) -> Value {
    json!({"type": "integer", "minimum": min, "maximum": max})
}

pub fn number() -> Value {
    json!({"type": "number"})
}

pub fn string_enum(values: &[&str]) -> Value {
    json!({"type": "string", "enum": values})
}

pub fn list(items: Value) -> Value {
    json!({"type": "array", "items": items})
}

pub fn string_list() -> Value {
    list(string())
}

/// Array of exactly `count` items.
pub fn exact_list(items: Value, count: usize) -> Value {
    json!({"type": "array", "items": items, "minItems": count, "maxItems": count})
}
