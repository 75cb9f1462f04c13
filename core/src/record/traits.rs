//! record/traits.rs
//! `Wire` (anything allowed as a field) and `Record` (ordered field list).

use std::io::{Read, Write};

use crate::codec::{Decoder, Encoder};
use crate::constants::LEN_PREFIX_LEN;
use crate::scalar::Scalar;
use crate::shape::{RecordShape, TypeShape, WireKind};
use crate::types::Result;

/// A type permitted as a record field.
///
/// Types without an impl (maps, `Option`, references, raw and function
/// pointers, `usize`/`isize`, enums) are rejected at compile time.
pub trait Wire {
    /// Smallest encoded size of any value of this type (default format, no tags).
    const MIN_WIRE_LEN: usize;

    fn wire_shape() -> TypeShape;

    fn wire_kind() -> WireKind;

    fn encode_wire<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()>;

    /// Decode in place, overwriting `self`.
    fn decode_wire<R: Read>(&mut self, dec: &mut Decoder<R>) -> Result<()>;
}

/// A fixed, ordered list of fields.
pub trait Record {
    fn record_shape() -> RecordShape;

    /// Encode every participating field in declared order.
    fn encode_fields<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()>;

    /// Decode every participating field in declared order.
    fn decode_fields<R: Read>(&mut self, dec: &mut Decoder<R>) -> Result<()>;
}

macro_rules! impl_scalar_wire {
    ($($ty:ty => $shape:ident),* $(,)?) => {
        $(
            impl Wire for $ty {
                const MIN_WIRE_LEN: usize = <$ty as Scalar>::WIDTH;

                fn wire_shape() -> TypeShape {
                    TypeShape::$shape
                }

                fn wire_kind() -> WireKind {
                    <$ty as Scalar>::KIND
                }

                #[inline]
                fn encode_wire<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
                    enc.write_scalar(*self)
                }

                #[inline]
                fn decode_wire<R: Read>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
                    *self = dec.read_scalar()?;
                    Ok(())
                }
            }
        )*
    };
}

impl_scalar_wire! {
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
}

impl Wire for String {
    const MIN_WIRE_LEN: usize = LEN_PREFIX_LEN;

    fn wire_shape() -> TypeShape {
        TypeShape::Text
    }

    fn wire_kind() -> WireKind {
        WireKind::Text
    }

    fn encode_wire<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_text(self)
    }

    fn decode_wire<R: Read>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_text()?;
        Ok(())
    }
}

/// Sequences of any field type, including sequences and records.
/// `Vec<u8>` has the same wire image as text.
impl<T: Wire + Default> Wire for Vec<T> {
    const MIN_WIRE_LEN: usize = LEN_PREFIX_LEN;

    fn wire_shape() -> TypeShape {
        TypeShape::seq(T::wire_shape())
    }

    fn wire_kind() -> WireKind {
        WireKind::Seq
    }

    fn encode_wire<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_seq(self)
    }

    fn decode_wire<R: Read>(&mut self, dec: &mut Decoder<R>) -> Result<()> {
        *self = dec.read_seq()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::classify;

    #[test]
    fn min_wire_len_matches_widths() {
        assert_eq!(<bool as Wire>::MIN_WIRE_LEN, 1);
        assert_eq!(<u16 as Wire>::MIN_WIRE_LEN, 2);
        assert_eq!(<f32 as Wire>::MIN_WIRE_LEN, 4);
        assert_eq!(<i64 as Wire>::MIN_WIRE_LEN, 8);
        assert_eq!(<String as Wire>::MIN_WIRE_LEN, 4);
        assert_eq!(<Vec<Vec<u64>> as Wire>::MIN_WIRE_LEN, 4);
    }

    #[test]
    fn static_shapes_classify_to_static_kinds() {
        assert_eq!(classify(&<i8 as Wire>::wire_shape()).unwrap(), <i8 as Wire>::wire_kind());
        assert_eq!(classify(&<String as Wire>::wire_shape()).unwrap(), WireKind::Text);
        assert_eq!(
            <Vec<Vec<String>> as Wire>::wire_shape(),
            TypeShape::seq(TypeShape::seq(TypeShape::Text))
        );
    }

    #[test]
    fn byte_vectors_share_the_text_image() {
        let mut a = Encoder::new(Vec::new());
        String::from("go").encode_wire(&mut a).unwrap();

        let mut b = Encoder::new(Vec::new());
        b"go".to_vec().encode_wire(&mut b).unwrap();

        assert_eq!(a.into_inner(), b.into_inner());
    }
}
