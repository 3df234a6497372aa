//! Composite shapes: whole records and homogeneous arrays assembled from
//! per-field conversions.

pub mod arr;
pub mod obj;

use serde_json::Value;

use crate::error::ConversionError;

pub use arr::Arr;
pub use obj::Obj;

/// A whole record or array.
///
/// These three operations are the entire extension contract: any type
/// implementing them is accepted wherever a compound is expected, including
/// nested inside another compound via
/// [`CompoundConv`](crate::conversion::CompoundConv).
pub trait Compound: Sized {
    /// Build an instance from a JSON value, failing with a typed
    /// [`ConversionError`] on any shape mismatch.
    fn from_json(value: &Value) -> Result<Self, ConversionError>;

    /// Serialize the instance. Total apart from dump-side variant guards.
    fn as_json(&self) -> Result<Value, ConversionError>;

    /// Structural schema of the shape. Pure metadata, no instance involved.
    fn schema() -> Value;
}
