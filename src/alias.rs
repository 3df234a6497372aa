//! Bidirectional mapping between field identifiers and JSON object keys,
//! for keys that cannot be spelled as identifiers (`from`, `type`, ...).

use indexmap::IndexMap;

use crate::error::ConversionError;

/// Injective field-identifier ↔ json-key table with identity fallback.
///
/// Built once at compound-declaration time, immutable afterwards; both
/// lookup directions are O(1).
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    field_to_key: IndexMap<String, String>,
    key_to_field: IndexMap<String, String>,
}

impl AliasTable {
    /// Build the table from `(field_identifier, json_key)` pairs.
    ///
    /// Fails with `AliasCollision` when either side repeats.
    pub fn new<I, F, K>(pairs: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator<Item = (F, K)>,
        F: Into<String>,
        K: Into<String>,
    {
        let mut table = Self::default();
        for (field, key) in pairs {
            let field = field.into();
            let key = key.into();
            if table.field_to_key.contains_key(&field) {
                return Err(ConversionError::alias_collision(field));
            }
            if table.key_to_field.contains_key(&key) {
                return Err(ConversionError::alias_collision(key));
            }
            table.key_to_field.insert(key.clone(), field.clone());
            table.field_to_key.insert(field, key);
        }
        Ok(table)
    }

    /// The json key a field serializes under; the identifier itself when
    /// no alias is declared.
    pub fn to_json_key<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_to_key.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Inverse lookup, identity fallback as well.
    pub fn to_field<'a>(&'a self, json_key: &'a str) -> &'a str {
        self.key_to_field.get(json_key).map(String::as_str).unwrap_or(json_key)
    }

    pub fn is_empty(&self) -> bool {
        self.field_to_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn lookups_are_symmetric() {
        let table = AliasTable::new([("from_", "from"), ("type_", "type")]).unwrap();
        assert_eq!(table.to_json_key("from_"), "from");
        assert_eq!(table.to_field("from"), "from_");
        assert_eq!(table.to_json_key("type_"), "type");
        assert_eq!(table.to_field("type"), "type_");
    }

    #[test]
    fn unmapped_names_fall_through_unchanged() {
        let table = AliasTable::new([("from_", "from")]).unwrap();
        assert_eq!(table.to_json_key("id"), "id");
        assert_eq!(table.to_field("id"), "id");
        assert!(AliasTable::default().is_empty());
    }

    #[test]
    fn duplicate_json_key_is_rejected() {
        let err = AliasTable::new([("a", "x"), ("b", "x")]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AliasCollision(k) if k == "x"));
    }

    #[test]
    fn duplicate_field_identifier_is_rejected() {
        let err = AliasTable::new([("a", "x"), ("a", "y")]).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AliasCollision(k) if k == "a"));
    }
}
