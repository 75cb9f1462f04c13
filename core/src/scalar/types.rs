//! scalar/types.rs
//! Per-type width, wire kind and byte order.

use std::fmt;
use std::io::{self, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::constants::widths;
use crate::shape::WireKind;

/// A fixed-width primitive.
pub trait Scalar: Copy + Default + fmt::Debug {
    const KIND: WireKind;
    const WIDTH: usize;

    /// Write exactly `WIDTH` big-endian bytes.
    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()>;

    /// Read from a slice of exactly `WIDTH` bytes.
    fn read_be(buf: &[u8]) -> Self;
}

impl Scalar for bool {
    const KIND: WireKind = WireKind::Bool;
    const WIDTH: usize = widths::BOOL;

    #[inline]
    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u8(self as u8)
    }

    /// Any nonzero byte is `true`.
    #[inline]
    fn read_be(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

impl Scalar for u8 {
    const KIND: WireKind = WireKind::U8;
    const WIDTH: usize = widths::W8;

    #[inline]
    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u8(self)
    }

    #[inline]
    fn read_be(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl Scalar for i8 {
    const KIND: WireKind = WireKind::I8;
    const WIDTH: usize = widths::W8;

    #[inline]
    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_i8(self)
    }

    #[inline]
    fn read_be(buf: &[u8]) -> Self {
        buf[0] as i8
    }
}

macro_rules! impl_be_scalar {
    ($ty:ty, $kind:ident, $width:path, $write:ident, $read:ident) => {
        impl Scalar for $ty {
            const KIND: WireKind = WireKind::$kind;
            const WIDTH: usize = $width;

            #[inline]
            fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
                w.$write::<BigEndian>(self)
            }

            #[inline]
            fn read_be(buf: &[u8]) -> Self {
                BigEndian::$read(buf)
            }
        }
    };
}

impl_be_scalar!(i16, I16, widths::W16, write_i16, read_i16);
impl_be_scalar!(u16, U16, widths::W16, write_u16, read_u16);
impl_be_scalar!(i32, I32, widths::W32, write_i32, read_i32);
impl_be_scalar!(u32, U32, widths::W32, write_u32, read_u32);
impl_be_scalar!(i64, I64, widths::W64, write_i64, read_i64);
impl_be_scalar!(u64, U64, widths::W64, write_u64, read_u64);
impl_be_scalar!(f32, F32, widths::W32, write_f32, read_f32);
impl_be_scalar!(f64, F64, widths::W64, write_f64, read_f64);
