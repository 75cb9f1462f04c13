//! value/decode.rs

use std::io::Read;

use tracing::trace;

use crate::codec::Decoder;
use crate::shape::{min_record_len, min_wire_len, RecordShape, TypeShape, WireKind};
use crate::types::{MarshalError, Result};
use crate::value::types::{DynRecord, Value};

/// Decode the fields of `shape` in declared order into a fresh dynamic record.
pub fn decode_record<R: Read>(dec: &mut Decoder<R>, shape: &RecordShape) -> Result<DynRecord> {
    decode_record_in(dec, shape, &mut Vec::new())
}

pub fn decode_field<R: Read>(dec: &mut Decoder<R>, shape: &TypeShape) -> Result<Value> {
    decode_field_in(dec, shape, &mut Vec::new())
}

/// `open` holds the enclosing records, innermost last; `RecordRef`s resolve
/// against it.
fn decode_record_in<'s, R: Read>(
    dec: &mut Decoder<R>,
    shape: &'s RecordShape,
    open: &mut Vec<&'s RecordShape>,
) -> Result<DynRecord> {
    dec.enter_record()?;
    open.push(shape);
    let res = decode_fields_in(dec, shape, open);
    open.pop();
    dec.leave_record();
    res
}

fn decode_fields_in<'s, R: Read>(
    dec: &mut Decoder<R>,
    shape: &'s RecordShape,
    open: &mut Vec<&'s RecordShape>,
) -> Result<DynRecord> {
    dec.expect_tag(WireKind::Record)?;
    let mut out = DynRecord::new(shape.name.clone());
    out.fields.reserve(shape.fields.len());
    for field in &shape.fields {
        trace!(record = %shape.name, field = %field.name, "decode field");
        let value = decode_field_in(dec, &field.shape, open).map_err(|e| e.in_field(&field.name))?;
        out.fields.push((field.name.clone(), value));
    }
    Ok(out)
}

fn resolve<'s>(name: &str, open: &[&'s RecordShape]) -> Result<&'s RecordShape> {
    open.iter()
        .rev()
        .find(|r| r.name == name)
        .copied()
        .ok_or_else(|| MarshalError::unsupported(format!("reference to record {} outside its declaration", name)))
}

fn decode_field_in<'s, R: Read>(
    dec: &mut Decoder<R>,
    shape: &'s TypeShape,
    open: &mut Vec<&'s RecordShape>,
) -> Result<Value> {
    Ok(match shape {
        TypeShape::Bool => Value::Bool(dec.read_scalar()?),
        TypeShape::I8 => Value::I8(dec.read_scalar()?),
        TypeShape::I16 => Value::I16(dec.read_scalar()?),
        TypeShape::I32 => Value::I32(dec.read_scalar()?),
        TypeShape::I64 => Value::I64(dec.read_scalar()?),
        TypeShape::U8 => Value::U8(dec.read_scalar()?),
        TypeShape::U16 => Value::U16(dec.read_scalar()?),
        TypeShape::U32 => Value::U32(dec.read_scalar()?),
        TypeShape::U64 => Value::U64(dec.read_scalar()?),
        TypeShape::F32 => Value::F32(dec.read_scalar()?),
        TypeShape::F64 => Value::F64(dec.read_scalar()?),
        TypeShape::Text => Value::Text(dec.read_text()?),
        TypeShape::Seq(elem) => {
            let min = match elem.as_ref() {
                TypeShape::RecordRef(name) => min_record_len(resolve(name, open)?),
                other => min_wire_len(other),
            };
            let count = dec.begin_seq(min)?;
            let mut items = Vec::with_capacity(dec.seq_capacity(count, min));
            for _ in 0..count {
                items.push(decode_field_in(dec, elem, open)?);
            }
            Value::Seq(items)
        }
        TypeShape::Record(r) => Value::Record(decode_record_in(dec, r, open)?),
        TypeShape::RecordRef(name) => {
            let target = resolve(name, open)?;
            Value::Record(decode_record_in(dec, target, open)?)
        }
        other => return Err(MarshalError::unsupported(other.name())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_value, encode_value};
    use crate::types::ErrorKind;

    fn sample_shape() -> TypeShape {
        let inner = RecordShape::new("Inner").field("id", TypeShape::U16);
        RecordShape::new("Outer")
            .field("name", TypeShape::Text)
            .field("grid", TypeShape::seq(TypeShape::seq(TypeShape::I8)))
            .field("children", TypeShape::seq(inner.into()))
            .into()
    }

    fn sample_value() -> Value {
        DynRecord::new("Outer")
            .field("name", "root")
            .field(
                "grid",
                Value::Seq(vec![
                    Value::Seq(vec![Value::I8(1), Value::I8(-2)]),
                    Value::Seq(vec![]),
                ]),
            )
            .field(
                "children",
                Value::Seq(vec![
                    DynRecord::new("Inner").field("id", 7u16).into(),
                    DynRecord::new("Inner").field("id", 9u16).into(),
                ]),
            )
            .into()
    }

    #[test]
    fn roundtrip_through_declared_shape() {
        let bytes = encode_value(&sample_value()).unwrap();
        let decoded = decode_value(&bytes, &sample_shape()).unwrap();
        assert_eq!(decoded, sample_value());
    }

    #[test]
    fn non_record_destination_is_invalid_type() {
        let err = decode_value(&[0, 0, 0, 1], &TypeShape::U32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidType);
    }

    #[test]
    fn unsupported_shape_is_rejected_before_reading() {
        let shape: TypeShape = RecordShape::new("R")
            .field("n", TypeShape::I32)
            .field("f", TypeShape::Function)
            .into();
        let mut dec = Decoder::from_slice(&[0, 0, 0, 1]);
        let err = dec.decode_value(&shape).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
        assert_eq!(dec.bytes_read(), 0);
    }

    #[test]
    fn zero_width_elements_cannot_inflate_a_short_input() {
        let shape: TypeShape = RecordShape::new("R")
            .field("items", TypeShape::seq(RecordShape::new("E").into()))
            .into();
        let err = decode_value(&[0x00, 0x10, 0x00, 0x00], &shape).unwrap_err();
        assert!(err.is_truncated(), "{err}");

        let ok = decode_value(&[0, 0, 0, 3], &shape).unwrap();
        let items = ok.as_record().and_then(|r| r.get("items")).cloned();
        assert_eq!(items, Some(Value::Seq(vec![DynRecord::new("E").into(); 3])));
    }

    fn tree_shape() -> TypeShape {
        RecordShape::new("Tree")
            .field("id", TypeShape::U8)
            .field("kids", TypeShape::seq(TypeShape::RecordRef("Tree".into())))
            .into()
    }

    #[test]
    fn back_references_decode_recursively() {
        let leaf = |id: u8| Value::from(DynRecord::new("Tree").field("id", id).field("kids", Value::Seq(vec![])));
        let tree: Value = DynRecord::new("Tree")
            .field("id", 1u8)
            .field("kids", Value::Seq(vec![leaf(2), leaf(3)]))
            .into();

        let bytes = encode_value(&tree).unwrap();
        assert_eq!(decode_value(&bytes, &tree_shape()).unwrap(), tree);
    }

    #[test]
    fn deep_nesting_is_rejected_not_overflowed() {
        // Each level: id, then a count of one child.
        let mut bytes = Vec::new();
        for _ in 0..2 * crate::constants::MAX_NESTING_DEPTH {
            bytes.extend_from_slice(&[7, 0, 0, 0, 1]);
        }
        let err = decode_value(&bytes, &tree_shape()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NestingTooDeep);
    }

    #[test]
    fn every_truncation_fails() {
        let bytes = encode_value(&sample_value()).unwrap();
        for cut in 0..bytes.len() {
            let err = decode_value(&bytes[..cut], &sample_shape()).unwrap_err();
            assert!(err.is_truncated(), "cut {cut}: {err}");
        }
    }
}
