// Error surface: every failure reaches the caller with the right kind, and
// nothing past the failing field is written.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use marshal_core::constants::{MAX_PREFIX_VALUE, MAX_ZERO_WIDTH_SEQ};
    use marshal_core::shape::{RecordShape, TypeShape};
    use marshal_core::{
        decode, decode_from, decode_value, encode, encode_value, CodecConfig, DynRecord, Encoder,
        ErrorKind, MarshalError, Record, Value, Wire,
    };

    #[derive(Debug, Default, PartialEq, Record)]
    struct Str {
        s: String,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Ints {
        values: Vec<u64>,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Nested {
        outer: u8,
        rows: Vec<Ints>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Record)]
    struct Hidden {
        #[marshal(skip)]
        note: String,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct Holder {
        items: Vec<Hidden>,
    }

    #[test]
    fn non_record_top_level_is_invalid_type() {
        let err = encode_value(&Value::I32(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidType);
        assert!(err.to_string().contains("int32"), "{err}");

        let err = decode_value(&[0, 0, 0, 1], &TypeShape::I32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidType);
    }

    #[test]
    fn unsupported_field_stops_output_at_the_failing_field() {
        let record = DynRecord::new("Config")
            .field("count", 1u32)
            .field("lookup", Value::Map(vec![]))
            .field("after", 9u8);

        let mut enc = Encoder::new(Vec::new());
        let err = enc.encode_value(&record.into()).unwrap_err();
        match err {
            MarshalError::UnsupportedFieldType { field, found } => {
                assert_eq!(field.as_deref(), Some("lookup"));
                assert_eq!(found, "map");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(enc.get_ref().as_slice(), &[0, 0, 0, 1]);
    }

    #[test]
    fn unsupported_element_inside_a_sequence() {
        let record = DynRecord::new("R").field(
            "items",
            Value::Seq(vec![Value::I8(1), Value::Optional(None)]),
        );
        let err = encode_value(&record.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
        assert!(err.to_string().contains("`items`"), "{err}");
    }

    #[test]
    fn unsupported_decode_shape_fails_before_reading() {
        let shape: TypeShape = RecordShape::new("R")
            .field("a", TypeShape::U8)
            .field("p", TypeShape::PlatformInt)
            .into();

        // Empty input would be a truncation if anything were read first.
        let err = decode_value(&[], &shape).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
    }

    #[test]
    fn short_text_payload_is_truncated() {
        let mut out = Str::default();
        match decode(&[0, 0, 0, 5, b'a'], &mut out).unwrap_err() {
            MarshalError::TruncatedInput { need, have } => {
                assert_eq!(need, 5);
                assert_eq!(have, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn short_prefix_is_truncated() {
        let err = decode(&[0, 0], &mut Str::default()).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn implausible_element_count_is_truncated() {
        // 0x7FFFFFFF u64 elements would need 16 GiB.
        let err = decode(&[0x7F, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0], &mut Ints::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn truncation_inside_nested_sequence() {
        // outer=1, one row, that row claims two u64 values but carries one.
        let bytes = [1, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 7];
        let err = decode(&bytes, &mut Nested::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn invalid_utf8_text_is_rejected() {
        let err = decode(&[0, 0, 0, 2, 0xC3, 0x28], &mut Str::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidText);
    }

    #[test]
    fn empty_input_for_nonempty_record_is_truncated() {
        let err = decode(&[], &mut Str::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn zero_width_element_count_is_capped() {
        assert_eq!(<Hidden as Wire>::MIN_WIRE_LEN, 0);

        let over = (MAX_ZERO_WIDTH_SEQ as u32 + 1).to_be_bytes();
        for prefix in [over, [0xFF; 4]] {
            let err = decode(&prefix, &mut Holder::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput);

            // Unknown-length source: nothing to check the count against.
            let err = decode_from(Cursor::new(prefix.to_vec()), &mut Holder::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        }
    }

    #[test]
    fn small_zero_width_sequences_still_decode() {
        let mut out = Holder::default();
        decode(&[0, 0, 0, 3], &mut out).unwrap();
        assert_eq!(out.items.len(), 3);

        let bytes = encode(&Holder { items: vec![Hidden::default(); 2] }).unwrap();
        assert_eq!(bytes, [0, 0, 0, 2]);
    }

    #[test]
    fn oversized_zero_width_sequence_is_not_encoded() {
        let holder = Holder { items: vec![Hidden::default(); MAX_ZERO_WIDTH_SEQ + 1] };
        let err = encode(&holder).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_sequence_count_writes_no_tag() {
        let mut enc = Encoder::with_config(Vec::new(), CodecConfig::self_describing());
        let err = enc.begin_seq(MAX_PREFIX_VALUE + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFieldType);
        assert_eq!(enc.bytes_written(), 0);
        assert!(enc.get_ref().is_empty());
    }
}
