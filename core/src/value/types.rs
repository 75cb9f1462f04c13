//! value/types.rs

use crate::shape::WireKind;
use crate::types::{MarshalError, Result};

/// A runtime field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Text(String),
    /// Elements are classified and encoded one by one.
    Seq(Vec<Value>),
    Record(DynRecord),

    // No wire mapping.
    Map(Vec<(Value, Value)>),
    Optional(Option<Box<Value>>),
}

impl Value {
    /// Wire category of this value; maps and optionals have none.
    pub fn classify(&self) -> Result<WireKind> {
        Ok(match self {
            Value::Bool(_) => WireKind::Bool,
            Value::I8(_) => WireKind::I8,
            Value::I16(_) => WireKind::I16,
            Value::I32(_) => WireKind::I32,
            Value::I64(_) => WireKind::I64,
            Value::U8(_) => WireKind::U8,
            Value::U16(_) => WireKind::U16,
            Value::U32(_) => WireKind::U32,
            Value::U64(_) => WireKind::U64,
            Value::F32(_) => WireKind::F32,
            Value::F64(_) => WireKind::F64,
            Value::Text(_) => WireKind::Text,
            Value::Seq(_) => WireKind::Seq,
            Value::Record(_) => WireKind::Record,
            Value::Map(_) | Value::Optional(_) => {
                return Err(MarshalError::unsupported(self.category()))
            }
        })
    }

    pub fn category(&self) -> &'static str {
        match self {
            Value::Map(_) => "map",
            Value::Optional(_) => "optional",
            other => match other.classify() {
                Ok(kind) => kind.name(),
                Err(_) => "unsupported",
            },
        }
    }

    pub fn as_record(&self) -> Option<&DynRecord> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
    Vec<Value> => Seq,
    DynRecord => Record,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Ordered named fields. Order is the wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynRecord {
    pub name: String,
    pub fields: Vec<(String, Value)>,
}

impl DynRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }

    /// Append a field; call in wire order.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
