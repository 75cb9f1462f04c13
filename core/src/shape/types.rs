//! shape/types.rs
//! Declared type descriptors and the closed set of wire categories.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{tag_ids, widths};

/// Wire category of a field. Discriminants double as self-describing tags.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum WireKind {
    Bool   = tag_ids::BOOL,
    I8     = tag_ids::I8,
    I16    = tag_ids::I16,
    I32    = tag_ids::I32,
    I64    = tag_ids::I64,
    U8     = tag_ids::U8,
    U16    = tag_ids::U16,
    U32    = tag_ids::U32,
    U64    = tag_ids::U64,
    F32    = tag_ids::F32,
    F64    = tag_ids::F64,
    Text   = tag_ids::TEXT,
    Seq    = tag_ids::SEQ,
    Record = tag_ids::RECORD,
}

impl WireKind {
    #[inline(always)]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Bytes on the wire for fixed-width categories, `None` for text,
    /// sequences and records.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            WireKind::Bool => Some(widths::BOOL),
            WireKind::I8 | WireKind::U8 => Some(widths::W8),
            WireKind::I16 | WireKind::U16 => Some(widths::W16),
            WireKind::I32 | WireKind::U32 | WireKind::F32 => Some(widths::W32),
            WireKind::I64 | WireKind::U64 | WireKind::F64 => Some(widths::W64),
            WireKind::Text | WireKind::Seq | WireKind::Record => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            WireKind::Bool => "bool",
            WireKind::I8 => "int8",
            WireKind::I16 => "int16",
            WireKind::I32 => "int32",
            WireKind::I64 => "int64",
            WireKind::U8 => "uint8",
            WireKind::U16 => "uint16",
            WireKind::U32 => "uint32",
            WireKind::U64 => "uint64",
            WireKind::F32 => "float32",
            WireKind::F64 => "float64",
            WireKind::Text => "text",
            WireKind::Seq => "sequence",
            WireKind::Record => "record",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of a field as seen by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Seq(Box<TypeShape>),
    Record(RecordShape),
    /// Back-reference to an enclosing record of this name, as produced by
    /// self-referential types (`struct Tree { kids: Vec<Tree> }`). Only valid
    /// with at least one sequence between it and its target.
    RecordRef(String),

    // No wire mapping for anything below.
    Map(Box<TypeShape>, Box<TypeShape>),
    Optional(Box<TypeShape>),
    /// Tagged union with no declared encoding strategy.
    Union(String),
    Function,
    Pointer(Box<TypeShape>),
    /// Integer whose width depends on the target (`usize`, `isize`).
    PlatformInt,
}

impl TypeShape {
    pub fn seq(elem: TypeShape) -> Self {
        TypeShape::Seq(Box::new(elem))
    }

    pub fn map(key: TypeShape, value: TypeShape) -> Self {
        TypeShape::Map(Box::new(key), Box::new(value))
    }

    pub fn name(&self) -> String {
        match self {
            TypeShape::Bool => "bool".into(),
            TypeShape::I8 => "int8".into(),
            TypeShape::I16 => "int16".into(),
            TypeShape::I32 => "int32".into(),
            TypeShape::I64 => "int64".into(),
            TypeShape::U8 => "uint8".into(),
            TypeShape::U16 => "uint16".into(),
            TypeShape::U32 => "uint32".into(),
            TypeShape::U64 => "uint64".into(),
            TypeShape::F32 => "float32".into(),
            TypeShape::F64 => "float64".into(),
            TypeShape::Text => "text".into(),
            TypeShape::Seq(elem) => format!("sequence<{}>", elem.name()),
            TypeShape::Record(r) => format!("record {}", r.name),
            TypeShape::RecordRef(name) => format!("record {}", name),
            TypeShape::Map(k, v) => format!("map<{}, {}>", k.name(), v.name()),
            TypeShape::Optional(inner) => format!("optional<{}>", inner.name()),
            TypeShape::Union(name) => format!("union {}", name),
            TypeShape::Function => "function".into(),
            TypeShape::Pointer(inner) => format!("pointer<{}>", inner.name()),
            TypeShape::PlatformInt => "platform-width integer".into(),
        }
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Ordered field list of a record type. Order is the wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordShape {
    pub name: String,
    pub fields: Vec<FieldShape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub name: String,
    pub shape: TypeShape,
}

impl RecordShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    /// Append a field; call in wire order.
    pub fn field(mut self, name: impl Into<String>, shape: TypeShape) -> Self {
        self.fields.push(FieldShape { name: name.into(), shape });
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<RecordShape> for TypeShape {
    fn from(r: RecordShape) -> Self {
        TypeShape::Record(r)
    }
}
