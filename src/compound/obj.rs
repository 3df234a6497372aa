//! Keyed, object-shaped compounds driven by a declared field table.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::alias::AliasTable;
use crate::conversion::Conversion;
use crate::error::ConversionError;
use crate::kind::Kind;
use crate::missing::MaybeMissing;
use crate::schema;

type SchemaFn = Box<dyn Fn() -> Value + Send + Sync>;
type DumpFieldFn<S> = Box<dyn Fn(&S) -> Result<Option<Value>, ConversionError> + Send + Sync>;
type LoadFieldFn<S> = Box<dyn Fn(&mut S, Option<&Value>) -> Result<(), ConversionError> + Send + Sync>;

struct FieldDef<S: 'static> {
    name: &'static str,
    required: bool,
    schema: SchemaFn,
    dump: DumpFieldFn<S>,
    load: LoadFieldFn<S>,
}

/// The field table of an object-shaped compound: an ordered list of
/// `(name, conversion, presence)` declarations plus an optional alias table.
///
/// Declared once per record type (typically in a `Lazy` static), immutable
/// afterwards, shared by every instance and read concurrently without locks.
/// Decoding seeds `S::default()` and loads each declared field in table
/// order; required fields are always overwritten or the decode fails.
pub struct Obj<S: 'static> {
    fields: Vec<FieldDef<S>>,
    aliases: AliasTable,
}

impl<S: 'static> Obj<S> {
    pub fn new() -> Self {
        Self { fields: Vec::new(), aliases: AliasTable::default() }
    }

    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self { fields: Vec::new(), aliases }
    }

    /// Declare a required field: an absent key fails with `MissingField`.
    pub fn field<T, C>(
        mut self,
        name: &'static str,
        conv: C,
        get: fn(&S) -> &T,
        set: fn(&mut S, T),
    ) -> Self
    where
        C: Conversion<T> + 'static,
        T: 'static,
    {
        let conv = Arc::new(conv);
        let dump_conv = Arc::clone(&conv);
        let load_conv = Arc::clone(&conv);
        self.fields.push(FieldDef {
            name,
            required: true,
            schema: Box::new(move || conv.schema()),
            dump: Box::new(move |instance| {
                dump_conv
                    .to_json(get(instance))
                    .map(Some)
                    .map_err(|e| e.in_field(name))
            }),
            load: Box::new(move |instance, value| match value {
                None => Err(ConversionError::missing_field(name)),
                Some(value) => {
                    set(instance, load_conv.from_json(value).map_err(|e| e.in_field(name))?);
                    Ok(())
                }
            }),
        });
        self
    }

    /// Declare a field whose key may be absent from the source object.
    ///
    /// An absent key binds `Missing`; a `Missing` value omits the key from
    /// the output entirely. Absence is not null: a present null still goes
    /// through the conversion.
    pub fn maybe_field<T, C>(
        mut self,
        name: &'static str,
        conv: C,
        get: fn(&S) -> &MaybeMissing<T>,
        set: fn(&mut S, MaybeMissing<T>),
    ) -> Self
    where
        C: Conversion<T> + 'static,
        T: 'static,
    {
        let conv = Arc::new(conv);
        let dump_conv = Arc::clone(&conv);
        let load_conv = Arc::clone(&conv);
        self.fields.push(FieldDef {
            name,
            required: false,
            schema: Box::new(move || conv.schema()),
            dump: Box::new(move |instance| match get(instance) {
                MaybeMissing::Present(value) => dump_conv
                    .to_json(value)
                    .map(Some)
                    .map_err(|e| e.in_field(name)),
                MaybeMissing::Missing => Ok(None),
            }),
            load: Box::new(move |instance, value| match value {
                None => {
                    set(instance, MaybeMissing::Missing);
                    Ok(())
                }
                Some(value) => {
                    let parsed = load_conv.from_json(value).map_err(|e| e.in_field(name))?;
                    set(instance, MaybeMissing::Present(parsed));
                    Ok(())
                }
            }),
        });
        self
    }

    /// Walk the field table over an object, resolving each field's aliased
    /// key. Keys present in the object but not declared are ignored.
    pub fn from_json(&self, value: &Value) -> Result<S, ConversionError>
    where
        S: Default,
    {
        let map = value
            .as_object()
            .ok_or_else(|| ConversionError::type_mismatch(Kind::Object, value))?;
        let mut out = S::default();
        for field in &self.fields {
            let key = self.aliases.to_json_key(field.name);
            (field.load)(&mut out, map.get(key))?;
        }
        Ok(out)
    }

    /// Serialize in table order under aliased keys, omitting `Missing`
    /// maybe-fields.
    pub fn as_json(&self, instance: &S) -> Result<Value, ConversionError> {
        let mut out = Map::new();
        for field in &self.fields {
            if let Some(value) = (field.dump)(instance)? {
                out.insert(self.aliases.to_json_key(field.name).to_owned(), value);
            }
        }
        Ok(Value::Object(out))
    }

    /// `{"type": "object", "properties": ..., "required": ...}` with aliased
    /// keys, properties in table order, maybe-missing fields not required.
    pub fn schema(&self) -> Value {
        let properties = self
            .fields
            .iter()
            .map(|f| (self.aliases.to_json_key(f.name).to_owned(), (f.schema)()));
        let required: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| self.aliases.to_json_key(f.name).to_owned())
            .collect();
        schema::object(properties, required)
    }
}

impl<S: 'static> Default for Obj<S> {
    fn default() -> Self {
        Self::new()
    }
}
