//! Shared leaf conversions.
//!
//! Built once at first use and reused everywhere: conversions are stateless
//! and side-effect-free, so one instance per process is all a program needs.

use once_cell::sync::Lazy;
use serde_json::Value;

use super::ConversionOf;
use crate::error::ConversionError;
use crate::kind::Kind;
use crate::schema;

/// `i64` ↔ JSON number. Non-integral numbers are rejected.
pub static INT_CONV: Lazy<ConversionOf<i64>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &i64| Value::from(*v),
        |v| match v {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| ConversionError::invalid_value(format!("{n} is not an i64"))),
            other => Err(ConversionError::type_mismatch(Kind::Number, other)),
        },
        schema::scalar("integer"),
    )
});

/// `f64` ↔ JSON number; integral numbers are accepted and widened.
pub static FLOAT_CONV: Lazy<ConversionOf<f64>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &f64| Value::from(*v),
        |v| match v {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| ConversionError::invalid_value(format!("{n} is not an f64"))),
            other => Err(ConversionError::type_mismatch(Kind::Number, other)),
        },
        schema::scalar("number"),
    )
});

/// `String` ↔ JSON string.
pub static STRING_CONV: Lazy<ConversionOf<String>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &String| Value::String(v.clone()),
        |v| match v {
            Value::String(s) => Ok(s.clone()),
            other => Err(ConversionError::type_mismatch(Kind::String, other)),
        },
        schema::scalar("string"),
    )
});

/// `bool` ↔ JSON bool.
pub static BOOL_CONV: Lazy<ConversionOf<bool>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &bool| Value::Bool(*v),
        |v| match v {
            Value::Bool(b) => Ok(*b),
            other => Err(ConversionError::type_mismatch(Kind::Bool, other)),
        },
        schema::scalar("boolean"),
    )
});

/// Raw passthrough: any JSON value, unchanged, with an unconstrained schema.
pub static IDENTITY_CONV: Lazy<ConversionOf<Value>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &Value| v.clone(),
        |v| Ok(v.clone()),
        serde_json::json!({}),
    )
});
