//! Typed conversion failures with location context.
//!
//! Every failure carries a [`Path`] of field names and array indices so the
//! top-level caller can point at the offending sub-value (`from_.username`,
//! `[1].id`) instead of guessing from a bare message.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::kind::Kind;

/// One step on the way down to the value that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seg {
    Field(String),
    Index(usize),
}

/// Ordered location of a failure inside the value tree, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Seg>);

impl Path {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[Seg] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                Seg::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Seg::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("missing value")]
    ValueAbsent,

    #[error("alias collision on `{0}`")]
    AliasCollision(String),

    #[error("{message}")]
    Custom {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// A conversion failure: what went wrong plus where in the tree it happened.
///
/// Each recursion level (object field, array element) prepends its segment
/// via [`ConversionError::in_field`] / [`ConversionError::at_index`] on the
/// way out.
#[derive(Debug)]
pub struct ConversionError {
    kind: ErrorKind,
    path: Path,
}

impl ConversionError {
    fn new(kind: ErrorKind) -> Self {
        Self { kind, path: Path::default() }
    }

    pub fn type_mismatch(expected: Kind, found: &Value) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, found: Kind::of(found) })
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue(message.into()))
    }

    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingField(name.into()))
    }

    pub fn value_absent() -> Self {
        Self::new(ErrorKind::ValueAbsent)
    }

    pub fn alias_collision(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::AliasCollision(name.into()))
    }

    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom { message: message.into(), source: None })
    }

    pub fn custom_with(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::new(ErrorKind::Custom { message: message.into(), source: Some(source) })
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn in_field(mut self, name: impl Into<String>) -> Self {
        self.path.0.insert(0, Seg::Field(name.into()));
        self
    }

    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.0.insert(0, Seg::Index(index));
        self
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
