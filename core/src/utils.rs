use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{DEFAULT_READ_CHUNK, MAX_READ_CHUNK, MIN_READ_CHUNK};
use crate::shape::WireKind;

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Display,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{}", variant),
        Err(_) => format!("0x{:02x}", raw),
    }
}

/// Human-readable name for a self-describing tag byte.
pub fn tag_name_or_hex(raw: u8) -> String {
    enum_name_or_hex::<WireKind>(raw)
}

/// Compact hex preview of wire bytes for log lines; long buffers are cut at `max`.
pub fn fmt_bytes(b: &[u8], max: usize) -> String {
    if b.len() <= max {
        hex::encode(b)
    } else {
        format!("{}..(+{} bytes)", hex::encode(&b[..max]), b.len() - max)
    }
}

/// Normalise a requested read step: zero means default, anything else is
/// clamped into `[MIN_READ_CHUNK, MAX_READ_CHUNK]`.
pub fn best_read_chunk(requested: usize) -> usize {
    match requested {
        0 => DEFAULT_READ_CHUNK,
        n => n.clamp(MIN_READ_CHUNK, MAX_READ_CHUNK),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_resolve_known_and_unknown() {
        assert_eq!(tag_name_or_hex(0x0C), "text");
        assert_eq!(tag_name_or_hex(0xEE), "0xee");
    }

    #[test]
    fn fmt_bytes_truncates_long_buffers() {
        assert_eq!(fmt_bytes(&[0x00, 0x03], 8), "0003");
        assert_eq!(fmt_bytes(&[0xAB; 6], 2), "abab..(+4 bytes)");
    }

    #[test]
    fn read_chunk_is_clamped() {
        assert_eq!(best_read_chunk(0), DEFAULT_READ_CHUNK);
        assert_eq!(best_read_chunk(1), MIN_READ_CHUNK);
        assert_eq!(best_read_chunk(usize::MAX), MAX_READ_CHUNK);
        assert_eq!(best_read_chunk(128 * 1024), 128 * 1024);
    }
}
