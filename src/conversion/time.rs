//! Datetime conversions: RFC 3339 strings and fractional Unix seconds.

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use serde_json::{Value, json};

use super::ConversionOf;
use crate::error::ConversionError;
use crate::kind::Kind;

/// Anchored ISO 8601 / RFC 3339 timestamp pattern for schema consumers.
const ISO_8601_PATTERN: &str = r"^(-?(?:[1-9][0-9]*)?[0-9]{4})-(1[0-2]|0[1-9])-(3[01]|0[1-9]|[12][0-9])T(2[0-3]|[01][0-9]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?(Z|[+-](?:2[0-3]|[01][0-9]):[0-5][0-9])?$";

/// `DateTime<FixedOffset>` ↔ RFC 3339 string, offset preserved.
pub static DATETIME_ISO_CONV: Lazy<ConversionOf<DateTime<FixedOffset>>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &DateTime<FixedOffset>| Value::String(v.to_rfc3339()),
        |v| {
            let s = v
                .as_str()
                .ok_or_else(|| ConversionError::type_mismatch(Kind::String, v))?;
            DateTime::parse_from_rfc3339(s)
                .map_err(|e| ConversionError::invalid_value(format!("invalid RFC 3339 timestamp: {e}")))
        },
        json!({"type": "string", "pattern": ISO_8601_PATTERN}),
    )
});

/// `DateTime<Utc>` ↔ fractional Unix seconds, millisecond precision.
pub static DATETIME_TIMESTAMP_CONV: Lazy<ConversionOf<DateTime<Utc>>> = Lazy::new(|| {
    ConversionOf::new(
        |v: &DateTime<Utc>| Value::from(v.timestamp_millis() as f64 / 1000.0),
        |v| {
            let secs = v
                .as_f64()
                .ok_or_else(|| ConversionError::type_mismatch(Kind::Number, v))?;
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
                .ok_or_else(|| ConversionError::invalid_value(format!("timestamp {secs} is out of range")))
        },
        json!({"type": "number"}),
    )
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::Conversion;
    use crate::error::ErrorKind;

    #[test]
    fn iso_round_trips_with_offset() {
        let parsed = DATETIME_ISO_CONV
            .from_json(&json!("2021-09-29T10:30:51+02:00"))
            .unwrap();
        let dumped = DATETIME_ISO_CONV.to_json(&parsed).unwrap();
        assert_eq!(dumped, json!("2021-09-29T10:30:51+02:00"));
    }

    #[test]
    fn iso_rejects_garbage_and_wrong_variants() {
        let err = DATETIME_ISO_CONV.from_json(&json!("yesterday")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidValue(_)));
        let err = DATETIME_ISO_CONV.from_json(&json!(1234)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: Kind::String, found: Kind::Number }
        ));
    }

    #[test]
    fn iso_schema_is_a_patterned_string() {
        let schema = DATETIME_ISO_CONV.schema();
        assert_eq!(schema["type"], json!("string"));
        assert!(schema["pattern"].as_str().unwrap().starts_with('^'));
    }

    #[test]
    fn timestamp_round_trips_at_millisecond_precision() {
        let t = DateTime::from_timestamp_millis(1_632_911_451_250).unwrap();
        let dumped = DATETIME_TIMESTAMP_CONV.to_json(&t).unwrap();
        assert_eq!(dumped, json!(1_632_911_451.25));
        assert_eq!(DATETIME_TIMESTAMP_CONV.from_json(&dumped).unwrap(), t);
    }

    #[test]
    fn timestamp_schema_is_a_number() {
        assert_eq!(DATETIME_TIMESTAMP_CONV.schema(), json!({"type": "number"}));
    }
}
