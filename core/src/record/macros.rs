//! record/macros.rs
//! Manual field registration for types that do not use the derive.

/// Implement `Record` and `Wire` for a struct by listing its fields, with
/// their types, in wire order. Fields left out of the list do not take part
/// in encoding and are left untouched on decode.
///
/// ```
/// use marshal_core::impl_record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Sample {
///     num: i64,
///     flag: bool,
///     cache: u32,
/// }
///
/// impl_record!(Sample { num: i64, flag: bool });
///
/// let bytes = marshal_core::encode(&Sample { num: 3, flag: true, cache: 9 }).unwrap();
/// assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 3, 1]);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn record_shape() -> $crate::shape::RecordShape {
                $crate::shape::build_record_shape::<Self>(|| {
                    $crate::shape::RecordShape::new(::core::stringify!($ty))
                        $(.field(::core::stringify!($field), <$fty as $crate::Wire>::wire_shape()))*
                })
            }

            #[allow(unused_variables)]
            fn encode_fields<W: ::std::io::Write>(
                &self,
                enc: &mut $crate::Encoder<W>,
            ) -> $crate::Result<()> {
                $(
                    <$fty as $crate::Wire>::encode_wire(&self.$field, enc)
                        .map_err(|e| e.in_field(::core::stringify!($field)))?;
                )*
                Ok(())
            }

            #[allow(unused_variables)]
            fn decode_fields<R: ::std::io::Read>(
                &mut self,
                dec: &mut $crate::Decoder<R>,
            ) -> $crate::Result<()> {
                $( <$fty as $crate::Wire>::decode_wire(&mut self.$field, dec)?; )*
                Ok(())
            }
        }

        impl $crate::Wire for $ty {
            const MIN_WIRE_LEN: usize = 0 $(+ <$fty as $crate::Wire>::MIN_WIRE_LEN)*;

            fn wire_shape() -> $crate::shape::TypeShape {
                $crate::shape::record_field_shape::<Self>(::core::stringify!($ty))
            }

            fn wire_kind() -> $crate::shape::WireKind {
                $crate::shape::WireKind::Record
            }

            fn encode_wire<W: ::std::io::Write>(
                &self,
                enc: &mut $crate::Encoder<W>,
            ) -> $crate::Result<()> {
                enc.write_record(self)
            }

            fn decode_wire<R: ::std::io::Read>(
                &mut self,
                dec: &mut $crate::Decoder<R>,
            ) -> $crate::Result<()> {
                dec.read_record(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::shape::{RecordShape, TypeShape};
    use crate::{decode, encode, Record, Wire};

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Path {
        label: String,
        points: Vec<Point>,
        dirty: bool,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Empty;

    impl_record!(Point { x: i32, y: i32 });
    impl_record!(Path { label: String, points: Vec<Point> });
    impl_record!(Empty {});

    #[derive(Debug, Default, PartialEq)]
    struct Chain {
        value: u16,
        next: Vec<Chain>,
    }

    impl_record!(Chain { value: u16, next: Vec<Chain> });

    #[test]
    fn listed_fields_roundtrip_in_order() {
        let path = Path {
            label: "zz".into(),
            points: vec![Point { x: 1, y: -1 }],
            dirty: false,
        };
        let bytes = encode(&path).unwrap();
        assert_eq!(
            bytes,
            [0, 0, 0, 2, b'z', b'z', 0, 0, 0, 1, 0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF]
        );

        let mut out = Path::default();
        decode(&bytes, &mut out).unwrap();
        assert_eq!(out, path);
    }

    #[test]
    fn unlisted_fields_are_left_untouched() {
        let bytes = encode(&Path { label: "a".into(), points: vec![], dirty: true }).unwrap();
        let mut out = Path { dirty: true, ..Path::default() };
        decode(&bytes, &mut out).unwrap();
        assert!(out.dirty);
        assert_eq!(out.label, "a");
    }

    #[test]
    fn shape_lists_registered_fields() {
        let expected = RecordShape::new("Point").field("x", TypeShape::I32).field("y", TypeShape::I32);
        assert_eq!(Point::record_shape(), expected);
        assert_eq!(<Point as Wire>::MIN_WIRE_LEN, 8);
    }

    #[test]
    fn self_referential_shape_ends_in_a_back_reference() {
        let expected = RecordShape::new("Chain")
            .field("value", TypeShape::U16)
            .field("next", TypeShape::seq(TypeShape::RecordRef("Chain".into())));
        assert_eq!(Chain::record_shape(), expected);
        assert_eq!(<Chain as Wire>::wire_shape(), TypeShape::Record(expected));
    }

    #[test]
    fn empty_record_encodes_to_nothing() {
        assert!(encode(&Empty).unwrap().is_empty());
        assert_eq!(<Empty as Wire>::MIN_WIRE_LEN, 0);
    }
}
