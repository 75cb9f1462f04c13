//! types.rs
//! Unified codec error shared by every layer.
//!
//! Every failure is returned to the immediate caller of encode/decode; the
//! first error aborts the whole traversal and nothing written or decoded so
//! far is considered valid.

use std::io;

use thiserror::Error;

use crate::shape::WireKind;
use crate::utils::tag_name_or_hex;

pub type Result<T, E = MarshalError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MarshalError {
    /// Top-level value is not a record, or the decode destination is not a record shape.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// A field's declared category has no wire mapping.
    #[error("unsupported field type{}: {found}", fmt_field(.field))]
    UnsupportedFieldType { field: Option<String>, found: String },

    /// Fewer bytes remain in the source than a prefix or fixed-width read requires.
    #[error("truncated input: need {need} bytes, {have} available")]
    TruncatedInput { need: usize, have: usize },

    /// Self-describing mode only: tag on the wire disagrees with the declared shape.
    #[error("shape mismatch: expected {expected}, found {}", fmt_tag(.found))]
    ShapeMismatch { expected: WireKind, found: u8 },

    /// Text payload is not UTF-8 and cannot populate a `String`.
    #[error("invalid text: {len} byte payload is not valid UTF-8")]
    InvalidText { len: usize },

    /// Input nests records deeper than the decoder follows.
    #[error("nesting too deep: more than {limit} records open")]
    NestingTooDeep { limit: usize },

    /// The wrapped sink/source failed.
    #[error("underlying I/O error: {0}")]
    UnderlyingIo(#[source] io::Error),
}

fn fmt_tag(raw: &u8) -> String {
    tag_name_or_hex(*raw)
}

fn fmt_field(field: &Option<String>) -> String {
    match field {
        Some(name) => format!(" in field `{}`", name),
        None => String::new(),
    }
}

/// Payload-free discriminant of [`MarshalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidType,
    UnsupportedFieldType,
    TruncatedInput,
    ShapeMismatch,
    InvalidText,
    NestingTooDeep,
    UnderlyingIo,
}

impl MarshalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarshalError::InvalidType(_) => ErrorKind::InvalidType,
            MarshalError::UnsupportedFieldType { .. } => ErrorKind::UnsupportedFieldType,
            MarshalError::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            MarshalError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            MarshalError::InvalidText { .. } => ErrorKind::InvalidText,
            MarshalError::NestingTooDeep { .. } => ErrorKind::NestingTooDeep,
            MarshalError::UnderlyingIo(_) => ErrorKind::UnderlyingIo,
        }
    }

    pub fn unsupported(found: impl Into<String>) -> Self {
        MarshalError::UnsupportedFieldType { field: None, found: found.into() }
    }

    /// Attach a field name to an `UnsupportedFieldType` that does not carry one yet.
    pub fn in_field(self, name: &str) -> Self {
        match self {
            MarshalError::UnsupportedFieldType { field: None, found } => {
                MarshalError::UnsupportedFieldType { field: Some(name.to_string()), found }
            }
            other => other,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.kind() == ErrorKind::TruncatedInput
    }
}

/// Allow `?` on std::io::Error.
/// Short reads are classified by `SourceReader::read_full`, which knows the
/// byte counts; everything arriving here is a transport failure.
impl From<io::Error> for MarshalError {
    fn from(e: io::Error) -> Self {
        MarshalError::UnderlyingIo(e)
    }
}
