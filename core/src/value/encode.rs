//! value/encode.rs

use std::io::Write;

use tracing::trace;

use crate::codec::Encoder;
use crate::shape::WireKind;
use crate::types::{MarshalError, Result};
use crate::value::types::{DynRecord, Value};

/// Encode every field of a dynamic record in order, flattened into the sink.
pub fn encode_record<W: Write>(enc: &mut Encoder<W>, record: &DynRecord) -> Result<()> {
    enc.write_tag(WireKind::Record)?;
    for (name, value) in &record.fields {
        trace!(record = %record.name, field = %name, "encode field");
        encode_field(enc, value).map_err(|e| e.in_field(name))?;
    }
    Ok(())
}

/// Route one value to the codec of its category.
pub fn encode_field<W: Write>(enc: &mut Encoder<W>, value: &Value) -> Result<()> {
    match value {
        Value::Bool(v) => enc.write_scalar(*v),
        Value::I8(v) => enc.write_scalar(*v),
        Value::I16(v) => enc.write_scalar(*v),
        Value::I32(v) => enc.write_scalar(*v),
        Value::I64(v) => enc.write_scalar(*v),
        Value::U8(v) => enc.write_scalar(*v),
        Value::U16(v) => enc.write_scalar(*v),
        Value::U32(v) => enc.write_scalar(*v),
        Value::U64(v) => enc.write_scalar(*v),
        Value::F32(v) => enc.write_scalar(*v),
        Value::F64(v) => enc.write_scalar(*v),
        Value::Text(s) => enc.write_text(s),
        Value::Seq(items) => {
            enc.begin_seq(items.len())?;
            for item in items {
                encode_field(enc, item)?;
            }
            Ok(())
        }
        Value::Record(r) => encode_record(enc, r),
        Value::Map(_) | Value::Optional(_) => Err(MarshalError::unsupported(value.category())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_value, CodecConfig};
    use crate::types::{ErrorKind, MarshalError};

    #[test]
    fn scenario_a_int_and_bool() {
        let r = DynRecord::new("A").field("Num", 3i64).field("Flag", true);
        assert_eq!(encode_value(&r.into()).unwrap(), [0, 0, 0, 0, 0, 0, 0, 3, 1]);
    }

    #[test]
    fn heterogeneous_sequences_encode_each_element_by_its_own_kind() {
        let r = DynRecord::new("Mixed").field(
            "items",
            Value::Seq(vec![Value::U8(7), Value::Text("a".into())]),
        );
        assert_eq!(encode_value(&r.into()).unwrap(), [0, 0, 0, 2, 7, 0, 0, 0, 1, b'a']);
    }

    #[test]
    fn unsupported_field_stops_output_at_the_field() {
        let r = DynRecord::new("Bad")
            .field("before", 1i32)
            .field("lookup", Value::Map(vec![(Value::from("k"), Value::from(1i32))]))
            .field("after", 2i32);

        let mut enc = Encoder::new(Vec::new());
        let err = enc.encode_value(&r.into()).unwrap_err();
        match &err {
            MarshalError::UnsupportedFieldType { field, found } => {
                assert_eq!(field.as_deref(), Some("lookup"));
                assert_eq!(found, "map");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(enc.into_inner(), [0, 0, 0, 1]);
    }

    #[test]
    fn optional_value_is_rejected_without_output() {
        let mut enc = Encoder::with_config(Vec::new(), CodecConfig::self_describing());
        let value = Value::Optional(Some(Box::new(Value::U8(1))));
        let err = encode_field(&mut enc, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
        assert_eq!(enc.bytes_written(), 0);
    }

    #[test]
    fn non_record_top_level_is_invalid_type() {
        let err = encode_value(&Value::I32(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidType);
    }
}
