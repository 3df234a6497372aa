//! The atomic conversion unit and its combinators.
//!
//! A [`Conversion`] turns one JSON value into one typed value and back, and
//! describes the shape it accepts as a schema fragment. Everything bigger
//! (optionals, lists, nested records) is a combinator wrapping smaller
//! conversions, so a whole document mapping is declared once as a tree of
//! plain values with no runtime reflection anywhere.

pub mod leaf;
pub mod time;

use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::compound::Compound;
use crate::error::ConversionError;
use crate::kind::Kind;
use crate::schema;

// ————————————————————————————————————————————————————————————————————————————
// TRAIT
// ————————————————————————————————————————————————————————————————————————————

/// Stateless bidirectional mapping between a JSON value and a typed value,
/// plus a schema fragment.
///
/// Conversions are built once, then shared freely (they are `Send + Sync`
/// and side-effect-free); many field tables may hold the same instance.
pub trait Conversion<T>: Send + Sync {
    /// Serialize a typed value.
    ///
    /// Total for every built-in conversion except [`WithTypeCheckOnDump`],
    /// which surfaces a `TypeMismatch` when its guard fails.
    fn to_json(&self, value: &T) -> Result<Value, ConversionError>;

    /// Parse a typed value out of a JSON value, failing with a typed
    /// [`ConversionError`] when the shape or content does not fit.
    fn from_json(&self, value: &Value) -> Result<T, ConversionError>;

    /// JSON-Schema-shaped description of the accepted values. Pure metadata:
    /// derived from static configuration, never from an instance.
    fn schema(&self) -> Value;
}

impl<'a, T, C: Conversion<T> + ?Sized> Conversion<T> for &'a C {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        (**self).to_json(value)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        (**self).from_json(value)
    }

    fn schema(&self) -> Value {
        (**self).schema()
    }
}

impl<T, C: Conversion<T> + ?Sized> Conversion<T> for Box<C> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        (**self).to_json(value)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        (**self).from_json(value)
    }

    fn schema(&self) -> Value {
        (**self).schema()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CLOSURE-BACKED CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

type DumpFn<T> = Box<dyn Fn(&T) -> Result<Value, ConversionError> + Send + Sync>;
type ReadFn<T> = Box<dyn Fn(&Value) -> Result<T, ConversionError> + Send + Sync>;

/// The general-purpose conversion: two closures plus a schema fragment.
///
/// Read closures report their own typed errors; untyped failures from
/// foreign code belong in `Custom` (see [`serde_conv`] for the pattern).
pub struct ConversionOf<T: 'static> {
    dump: DumpFn<T>,
    read: ReadFn<T>,
    schema: Value,
}

impl<T: 'static> ConversionOf<T> {
    pub fn new(
        to_json: impl Fn(&T) -> Value + Send + Sync + 'static,
        from_json: impl Fn(&Value) -> Result<T, ConversionError> + Send + Sync + 'static,
        schema: Value,
    ) -> Self {
        Self {
            dump: Box::new(move |value| Ok(to_json(value))),
            read: Box::new(from_json),
            schema,
        }
    }

    /// Like [`ConversionOf::new`] for dump closures that can themselves fail.
    pub fn fallible(
        to_json: impl Fn(&T) -> Result<Value, ConversionError> + Send + Sync + 'static,
        from_json: impl Fn(&Value) -> Result<T, ConversionError> + Send + Sync + 'static,
        schema: Value,
    ) -> Self {
        Self {
            dump: Box::new(to_json),
            read: Box::new(from_json),
            schema,
        }
    }
}

impl<T: 'static> Conversion<T> for ConversionOf<T> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        (self.dump)(value)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        (self.read)(value)
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }
}

/// Bridge a serde-ready type through the generic value tree.
///
/// Serde failures surface as `Custom` errors carrying the serde error as
/// their source.
pub fn serde_conv<T>(schema: Value) -> ConversionOf<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    ConversionOf::fallible(
        |value: &T| {
            serde_json::to_value(value)
                .map_err(|e| ConversionError::custom_with("serialization failed", e.into()))
        },
        |value| {
            serde_json::from_value(value.clone())
                .map_err(|e| ConversionError::custom_with("deserialization failed", e.into()))
        },
        schema,
    )
}

// ————————————————————————————————————————————————————————————————————————————
// VARIANT GUARDS
// ————————————————————————————————————————————————————————————————————————————

/// Guards the dump side of a wrapped conversion: the produced JSON value
/// must have the expected variant.
///
/// Conversions assembled from raw closures carry no guarantee about the
/// shape they emit; this is the one explicit runtime check at that boundary,
/// and the one way `to_json` can fail.
pub struct WithTypeCheckOnDump<C> {
    expect: Kind,
    inner: C,
}

impl<C> WithTypeCheckOnDump<C> {
    pub fn new(expect: Kind, inner: C) -> Self {
        Self { expect, inner }
    }
}

impl<T, C: Conversion<T>> Conversion<T> for WithTypeCheckOnDump<C> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        let out = self.inner.to_json(value)?;
        if Kind::of(&out) != self.expect {
            return Err(ConversionError::type_mismatch(self.expect, &out));
        }
        Ok(out)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        self.inner.from_json(value)
    }

    fn schema(&self) -> Value {
        self.inner.schema()
    }
}

/// Guards the read side: the input JSON value must have the expected
/// variant before the wrapped conversion sees it.
pub struct WithTypeCheckOnRead<C> {
    expect: Kind,
    inner: C,
}

impl<C> WithTypeCheckOnRead<C> {
    pub fn new(expect: Kind, inner: C) -> Self {
        Self { expect, inner }
    }
}

impl<T, C: Conversion<T>> Conversion<T> for WithTypeCheckOnRead<C> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        self.inner.to_json(value)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        if Kind::of(value) != self.expect {
            return Err(ConversionError::type_mismatch(self.expect, value));
        }
        self.inner.from_json(value)
    }

    fn schema(&self) -> Value {
        self.inner.schema()
    }
}

/// Wrap `c` with both variant guards.
pub fn with_type_checks<T, C: Conversion<T>>(
    on_dump: Kind,
    on_read: Kind,
    c: C,
) -> WithTypeCheckOnRead<WithTypeCheckOnDump<C>> {
    WithTypeCheckOnRead::new(on_read, WithTypeCheckOnDump::new(on_dump, c))
}

// ————————————————————————————————————————————————————————————————————————————
// STRUCTURAL COMBINATORS
// ————————————————————————————————————————————————————————————————————————————

/// Lifts a `Conversion<T>` to `Conversion<Option<T>>`: `None` ↔ null,
/// anything else delegated. The schema's `type` is widened with `"null"`.
pub struct OptionalConv<C>(pub C);

impl<T, C: Conversion<T>> Conversion<Option<T>> for OptionalConv<C> {
    fn to_json(&self, value: &Option<T>) -> Result<Value, ConversionError> {
        match value {
            None => Ok(Value::Null),
            Some(inner) => self.0.to_json(inner),
        }
    }

    fn from_json(&self, value: &Value) -> Result<Option<T>, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => self.0.from_json(other).map(Some),
        }
    }

    fn schema(&self) -> Value {
        schema::with_null(self.0.schema())
    }
}

/// Adapts a [`Compound`] type into a conversion so records nest inside
/// records and arrays.
///
/// Compound graphs must stay acyclic: a self-referential definition needs a
/// cyclic lazy initialization, which fails at first use instead of looping
/// in `schema()`.
pub struct CompoundConv<C>(PhantomData<fn() -> C>);

impl<C> CompoundConv<C> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for CompoundConv<C> {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compound_conv<C: Compound>() -> CompoundConv<C> {
    CompoundConv::new()
}

impl<C: Compound> Conversion<C> for CompoundConv<C> {
    fn to_json(&self, value: &C) -> Result<Value, ConversionError> {
        value.as_json()
    }

    fn from_json(&self, value: &Value) -> Result<C, ConversionError> {
        C::from_json(value)
    }

    fn schema(&self) -> Value {
        C::schema()
    }
}

/// Lifts an element conversion to `Conversion<Vec<T>>`; element failures
/// are annotated with their index.
pub struct ListConv<C>(pub C);

impl<T, C: Conversion<T>> Conversion<Vec<T>> for ListConv<C> {
    fn to_json(&self, value: &Vec<T>) -> Result<Value, ConversionError> {
        let mut out = Vec::with_capacity(value.len());
        for (i, item) in value.iter().enumerate() {
            out.push(self.0.to_json(item).map_err(|e| e.at_index(i))?);
        }
        Ok(Value::Array(out))
    }

    fn from_json(&self, value: &Value) -> Result<Vec<T>, ConversionError> {
        let items = value
            .as_array()
            .ok_or_else(|| ConversionError::type_mismatch(Kind::Array, value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.0.from_json(item).map_err(|e| e.at_index(i)))
            .collect()
    }

    fn schema(&self) -> Value {
        schema::array(self.0.schema())
    }
}

/// Conversion for maps whose keys are not known in advance.
///
/// The key conversion must dump to JSON strings; anything else is a
/// `TypeMismatch` at dump time.
pub struct MappingConv<KC, VC> {
    pub key: KC,
    pub val: VC,
}

impl<K, V, KC, VC> Conversion<IndexMap<K, V>> for MappingConv<KC, VC>
where
    K: Eq + Hash,
    KC: Conversion<K>,
    VC: Conversion<V>,
{
    fn to_json(&self, value: &IndexMap<K, V>) -> Result<Value, ConversionError> {
        let mut out = Map::new();
        for (k, v) in value {
            let key = match self.key.to_json(k)? {
                Value::String(key) => key,
                other => return Err(ConversionError::type_mismatch(Kind::String, &other)),
            };
            let val = self.val.to_json(v).map_err(|e| e.in_field(key.clone()))?;
            out.insert(key, val);
        }
        Ok(Value::Object(out))
    }

    fn from_json(&self, value: &Value) -> Result<IndexMap<K, V>, ConversionError> {
        let map = value
            .as_object()
            .ok_or_else(|| ConversionError::type_mismatch(Kind::Object, value))?;
        let mut out = IndexMap::with_capacity(map.len());
        for (k, v) in map {
            let key = self
                .key
                .from_json(&Value::String(k.clone()))
                .map_err(|e| e.in_field(k.clone()))?;
            let val = self.val.from_json(v).map_err(|e| e.in_field(k.clone()))?;
            out.insert(key, val);
        }
        Ok(out)
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "additionalProperties": self.val.schema()})
    }
}

/// Conversion over a closed set of `(variant, literal)` pairs.
#[derive(Debug)]
pub struct EnumConv<T> {
    pairs: Vec<(T, Value)>,
    schema: Value,
}

impl<T: Clone + PartialEq + Send + Sync> EnumConv<T> {
    /// All literals must share one scalar JSON kind; numbers report an
    /// `"integer"` schema type when every literal is integral.
    pub fn new(pairs: impl IntoIterator<Item = (T, Value)>) -> Result<Self, ConversionError> {
        let pairs: Vec<(T, Value)> = pairs.into_iter().collect();
        let Some((_, first)) = pairs.first() else {
            return Err(ConversionError::invalid_value("enum needs at least one variant"));
        };
        let kind = Kind::of(first);
        let type_name = match kind {
            Kind::String => "string",
            Kind::Bool => "boolean",
            Kind::Number => {
                if pairs.iter().all(|(_, lit)| lit.as_i64().is_some() || lit.as_u64().is_some()) {
                    "integer"
                } else {
                    "number"
                }
            }
            other => {
                return Err(ConversionError::invalid_value(format!(
                    "enum literals must be scalars, got {other}"
                )));
            }
        };
        if let Some((_, odd)) = pairs.iter().find(|(_, lit)| Kind::of(lit) != kind) {
            return Err(ConversionError::invalid_value(format!(
                "enum literals must share one type, got {kind} and {}",
                Kind::of(odd)
            )));
        }
        let literals: Vec<Value> = pairs.iter().map(|(_, lit)| lit.clone()).collect();
        let schema = json!({"type": type_name, "enum": literals});
        Ok(Self { pairs, schema })
    }
}

impl<T: Clone + PartialEq + Send + Sync> Conversion<T> for EnumConv<T> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        self.pairs
            .iter()
            .find(|(variant, _)| variant == value)
            .map(|(_, lit)| lit.clone())
            .ok_or_else(|| ConversionError::invalid_value("value is not a declared variant"))
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        self.pairs
            .iter()
            .find(|(_, lit)| lit == value)
            .map(|(variant, _)| variant.clone())
            .ok_or_else(|| {
                ConversionError::invalid_value(format!("{value} is not one of the enum literals"))
            })
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }
}

/// Overrides the schema fragment of a wrapped conversion, leaving both data
/// directions untouched.
pub struct WithSchema<C> {
    inner: C,
    schema: Value,
}

impl<C> WithSchema<C> {
    pub fn new(inner: C, schema: Value) -> Self {
        Self { inner, schema }
    }
}

impl<T, C: Conversion<T>> Conversion<T> for WithSchema<C> {
    fn to_json(&self, value: &T) -> Result<Value, ConversionError> {
        self.inner.to_json(value)
    }

    fn from_json(&self, value: &Value) -> Result<T, ConversionError> {
        self.inner.from_json(value)
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::leaf::{IDENTITY_CONV, INT_CONV, STRING_CONV};
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn optional_maps_none_to_null_and_back() {
        let conv = OptionalConv(&*STRING_CONV);
        assert_eq!(conv.to_json(&None).unwrap(), Value::Null);
        assert_eq!(conv.to_json(&Some("x".to_string())).unwrap(), json!("x"));
        assert_eq!(conv.from_json(&Value::Null).unwrap(), None);
        assert_eq!(conv.from_json(&json!("x")).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn optional_schema_includes_null() {
        let conv = OptionalConv(&*STRING_CONV);
        assert_eq!(conv.schema(), json!({"type": ["string", "null"]}));
    }

    #[test]
    fn optional_propagates_inner_failures() {
        let conv = OptionalConv(&*STRING_CONV);
        let err = conv.from_json(&json!(5)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: Kind::String, found: Kind::Number }
        ));
    }

    #[test]
    fn dump_check_rejects_the_wrong_variant() {
        // An identity passthrough dressed up as a string conversion: the
        // guard is what catches a non-string leaking out.
        let conv = with_type_checks(Kind::String, Kind::String, &*IDENTITY_CONV);
        assert_eq!(conv.to_json(&json!("ok")).unwrap(), json!("ok"));
        let err = conv.to_json(&json!(42)).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: Kind::String, found: Kind::Number }
        ));
    }

    #[test]
    fn read_check_rejects_the_wrong_variant() {
        let conv = with_type_checks(Kind::String, Kind::String, &*IDENTITY_CONV);
        let err = conv.from_json(&json!([1])).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: Kind::String, found: Kind::Array }
        ));
    }

    #[test]
    fn list_round_trips_and_annotates_element_errors() {
        let conv = ListConv(&*INT_CONV);
        let values = vec![1i64, 2, 3];
        let dumped = conv.to_json(&values).unwrap();
        assert_eq!(dumped, json!([1, 2, 3]));
        assert_eq!(conv.from_json(&dumped).unwrap(), values);

        let err = conv.from_json(&json!([1, "two", 3])).unwrap_err();
        assert_eq!(err.path().to_string(), "[1]");

        let err = conv.from_json(&json!({"not": "a list"})).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: Kind::Array, .. }
        ));
    }

    #[test]
    fn mapping_converts_non_string_keys() {
        let key_conv = ConversionOf::new(
            |k: &i64| Value::String(k.to_string()),
            |v| {
                let s = v
                    .as_str()
                    .ok_or_else(|| ConversionError::type_mismatch(Kind::String, v))?;
                s.parse::<i64>()
                    .map_err(|e| ConversionError::invalid_value(format!("bad integer key: {e}")))
            },
            json!({"type": "string"}),
        );
        let conv = MappingConv { key: key_conv, val: &*STRING_CONV };

        let mut map = IndexMap::new();
        map.insert(443i64, "hello there".to_string());
        let dumped = conv.to_json(&map).unwrap();
        assert_eq!(dumped, json!({"443": "hello there"}));
        assert_eq!(conv.from_json(&dumped).unwrap(), map);

        assert_eq!(
            conv.schema(),
            json!({"type": "object", "additionalProperties": {"type": "string"}})
        );
    }

    #[test]
    fn mapping_annotates_value_errors_with_the_key() {
        let conv = MappingConv { key: &*STRING_CONV, val: &*INT_CONV };
        let err = conv.from_json(&json!({"a": 1, "b": "oops"})).unwrap_err();
        assert_eq!(err.path().to_string(), "b");
    }

    #[test]
    fn enum_conv_round_trips_and_rejects_strays() {
        #[derive(Debug, Clone, PartialEq)]
        enum Lang {
            En,
            De,
        }
        let conv = EnumConv::new([(Lang::En, json!("en")), (Lang::De, json!("de"))]).unwrap();
        assert_eq!(conv.to_json(&Lang::De).unwrap(), json!("de"));
        assert_eq!(conv.from_json(&json!("en")).unwrap(), Lang::En);
        assert_eq!(conv.schema(), json!({"type": "string", "enum": ["en", "de"]}));

        let err = conv.from_json(&json!("fr")).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidValue(_)));
    }

    #[test]
    fn enum_conv_reports_integer_schemas() {
        let conv = EnumConv::new([(1u8, json!(1)), (2u8, json!(2)), (3u8, json!(3))]).unwrap();
        assert_eq!(conv.schema(), json!({"type": "integer", "enum": [1, 2, 3]}));
    }

    #[test]
    fn enum_conv_rejects_mixed_or_composite_literals() {
        let err = EnumConv::new([(1u8, json!(1)), (2u8, json!("two"))]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidValue(_)));

        let err = EnumConv::new([(1u8, json!({"x": 1}))]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidValue(_)));
    }

    #[test]
    fn with_schema_overrides_only_the_fragment() {
        let conv = WithSchema::new(&*STRING_CONV, json!({"type": "string", "format": "uri"}));
        assert_eq!(conv.schema(), json!({"type": "string", "format": "uri"}));
        assert_eq!(conv.from_json(&json!("https://example.com")).unwrap(), "https://example.com");
    }

    #[test]
    fn serde_conv_bridges_serde_types() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Point {
            x: i64,
            y: i64,
        }
        let conv = serde_conv::<Point>(json!({"type": "object"}));
        let dumped = conv.to_json(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(dumped, json!({"x": 1, "y": 2}));
        assert_eq!(conv.from_json(&dumped).unwrap(), Point { x: 1, y: 2 });

        let err = conv.from_json(&json!({"x": 1})).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Custom { .. }));
    }
}
