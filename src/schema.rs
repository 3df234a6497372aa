//! Canonical builders for the JSON-Schema-shaped fragments every conversion
//! reports.
//!
//! Only the structural subset is assembled here: `type`, `properties`,
//! `required`, `items`. Validation keywords (`pattern`, `enum`,
//! `additionalProperties`, ...) travel inside caller-supplied fragments and
//! pass through untouched.

use serde_json::{Map, Value, json};

/// `{"type": name}`.
pub fn scalar(name: &str) -> Value {
    json!({"type": name})
}

/// `{"type": "array", "items": ...}`.
pub fn array(items: Value) -> Value {
    json!({"type": "array", "items": items})
}

/// `{"type": "object", "properties": {...}, "required": [...]}`.
///
/// Property order follows the iterator, which is preserved in the emitted
/// object.
pub fn object(
    properties: impl IntoIterator<Item = (String, Value)>,
    required: impl IntoIterator<Item = String>,
) -> Value {
    let mut props = Map::new();
    for (key, fragment) in properties {
        props.insert(key, fragment);
    }
    let mut out = Map::new();
    out.insert("type".into(), Value::from("object"));
    out.insert("properties".into(), Value::Object(props));
    out.insert(
        "required".into(),
        Value::Array(required.into_iter().map(Value::from).collect()),
    );
    Value::Object(out)
}

/// Widen a fragment's `type` enumeration with `"null"`.
///
/// A scalar `type` string becomes a two-element array; a list gets `"null"`
/// appended if absent; a fragment with no `type` key passes through
/// unchanged.
pub fn with_null(mut fragment: Value) -> Value {
    if let Some(ty) = fragment.get_mut("type") {
        match ty {
            Value::String(name) => {
                let name = std::mem::take(name);
                *ty = Value::Array(vec![Value::String(name), Value::from("null")]);
            }
            Value::Array(names) => {
                if !names.iter().any(|n| n == "null") {
                    names.push(Value::from("null"));
                }
            }
            _ => {}
        }
    }
    fragment
}
