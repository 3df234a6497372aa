//! Declarative, bidirectional mapping between typed Rust records and a
//! generic JSON value tree (`serde_json::Value` with ordered objects).
//!
//! The pieces, leaf-first:
//! - [`Conversion`]: one JSON value ↔ one typed value, plus a schema
//!   fragment describing the accepted shape.
//! - Combinators ([`OptionalConv`], [`ListConv`], [`MappingConv`],
//!   [`EnumConv`], the variant guards, [`CompoundConv`]) that build bigger
//!   conversions out of smaller ones.
//! - [`MaybeMissing`]: "key absent" kept distinct from "key present but
//!   null".
//! - [`AliasTable`]: field identifiers ↔ json keys when the wire key cannot
//!   be an identifier.
//! - [`Compound`] with [`Obj`] / [`Arr`]: whole records and arrays driven by
//!   a field table declared once and shared everywhere.
//! - [`schema`]: the JSON-Schema-subset fragment builders all of the above
//!   report through.
//!
//! Everything is pure and immutable after declaration; definitions are
//! `Send + Sync` and read concurrently without locks.

pub mod alias;
pub mod compound;
pub mod conversion;
pub mod error;
pub mod kind;
pub mod missing;
pub mod schema;

pub use alias::AliasTable;
pub use compound::{Arr, Compound, Obj};
pub use conversion::leaf::{BOOL_CONV, FLOAT_CONV, IDENTITY_CONV, INT_CONV, STRING_CONV};
pub use conversion::time::{DATETIME_ISO_CONV, DATETIME_TIMESTAMP_CONV};
pub use conversion::{
    CompoundConv, Conversion, ConversionOf, EnumConv, ListConv, MappingConv, OptionalConv,
    WithSchema, WithTypeCheckOnDump, WithTypeCheckOnRead, compound_conv, serde_conv,
    with_type_checks,
};
pub use error::{ConversionError, ErrorKind, Path, Seg};
pub use kind::Kind;
pub use missing::MaybeMissing;
pub use missing::MaybeMissing::{Missing, Present};
