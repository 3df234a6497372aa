//! Positional, array-shaped compounds: one element conversion applied to
//! every item.

use serde_json::Value;

use crate::conversion::Conversion;
use crate::error::ConversionError;
use crate::kind::Kind;
use crate::schema;

/// The element table of an array-shaped compound.
///
/// Like [`Obj`](crate::compound::Obj) it is declared once, immutable and
/// freely shared; unlike `Obj` there is nothing to declare but the single
/// element conversion.
pub struct Arr<T: 'static> {
    elem: Box<dyn Conversion<T>>,
}

impl<T: 'static> Arr<T> {
    pub fn new(elem: impl Conversion<T> + 'static) -> Self {
        Self { elem: Box::new(elem) }
    }

    /// Map the element conversion over every item in order, failing on the
    /// first element error, annotated with its index.
    pub fn from_json(&self, value: &Value) -> Result<Vec<T>, ConversionError> {
        let items = value
            .as_array()
            .ok_or_else(|| ConversionError::type_mismatch(Kind::Array, value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.elem.from_json(item).map_err(|e| e.at_index(i)))
            .collect()
    }

    pub fn as_json(&self, items: &[T]) -> Result<Value, ConversionError> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            out.push(self.elem.to_json(item).map_err(|e| e.at_index(i))?);
        }
        Ok(Value::Array(out))
    }

    pub fn schema(&self) -> Value {
        schema::array(self.elem.schema())
    }
}
