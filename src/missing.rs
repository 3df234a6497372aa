//! Presence wrapper keeping "key absent from the object" distinct from "key
//! present with a null value".

use crate::error::ConversionError;

/// A value that may have been absent from the source object altogether.
///
/// Not a nullable: a field of type `MaybeMissing<Option<T>>` distinguishes
/// all three of absent, null and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaybeMissing<T> {
    Present(T),
    Missing,
}

impl<T> MaybeMissing<T> {
    pub fn has(&self) -> bool {
        matches!(self, MaybeMissing::Present(_))
    }

    /// Borrow the contained value, failing with `ValueAbsent` when missing.
    pub fn value(&self) -> Result<&T, ConversionError> {
        match self {
            MaybeMissing::Present(value) => Ok(value),
            MaybeMissing::Missing => Err(ConversionError::value_absent()),
        }
    }

    pub fn into_value(self) -> Result<T, ConversionError> {
        match self {
            MaybeMissing::Present(value) => Ok(value),
            MaybeMissing::Missing => Err(ConversionError::value_absent()),
        }
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            MaybeMissing::Present(value) => Some(value),
            MaybeMissing::Missing => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaybeMissing<U> {
        match self {
            MaybeMissing::Present(value) => MaybeMissing::Present(f(value)),
            MaybeMissing::Missing => MaybeMissing::Missing,
        }
    }
}

impl<T> Default for MaybeMissing<T> {
    fn default() -> Self {
        MaybeMissing::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::MaybeMissing::{self, Missing, Present};
    use crate::error::ErrorKind;

    #[test]
    fn present_holds_its_value() {
        let m = Present(7);
        assert!(m.has());
        assert_eq!(m.value().unwrap(), &7);
        assert_eq!(m.into_value().unwrap(), 7);
    }

    #[test]
    fn missing_fails_with_value_absent() {
        let m: MaybeMissing<i64> = Missing;
        assert!(!m.has());
        let err = m.value().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ValueAbsent));
    }

    #[test]
    fn equality_compares_contained_state() {
        assert_eq!(Present("a"), Present("a"));
        assert_ne!(Present("a"), Present("b"));
        assert_eq!(MaybeMissing::<&str>::Missing, Missing);
        assert_ne!(Present("a"), Missing);
    }

    #[test]
    fn default_is_missing() {
        assert_eq!(MaybeMissing::<String>::default(), Missing);
    }

    #[test]
    fn map_keeps_presence() {
        assert_eq!(Present(2).map(|v| v * 2), Present(4));
        assert_eq!(MaybeMissing::<i64>::Missing.map(|v| v * 2), Missing);
    }
}
