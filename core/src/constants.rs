//! constants.rs
//! Wire widths, tag ids and read sizing shared by every codec layer.

/// Width of every length prefix (text byte count, sequence element count).
pub const LEN_PREFIX_LEN: usize = 4;

/// Largest value a length prefix can carry.
pub const MAX_PREFIX_VALUE: usize = u32::MAX as usize;

/// Width of a self-describing tag byte.
pub const TAG_LEN: usize = 1;

/// Most elements a sequence may declare when its element type occupies no
/// bytes on the wire (records with no participating fields). Such elements
/// cannot be checked against the remaining input.
pub const MAX_ZERO_WIDTH_SEQ: usize = 64 * 1024;

/// Deepest record nesting a decoder follows before giving up.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Fixed scalar widths (bytes on the wire).
pub mod widths {
    pub const BOOL: usize = 1;
    pub const W8: usize = 1;
    pub const W16: usize = 2;
    pub const W32: usize = 4;
    pub const W64: usize = 8;
    /// Widest scalar; sizes the scratch buffer used for fixed-width reads.
    pub const MAX_SCALAR: usize = W64;
}

/// Tag ids written before each value when self-description is enabled.
/// Mirrored by `WireKind` discriminants.
pub mod tag_ids {
    pub const BOOL: u8   = 0x01;
    pub const I8: u8     = 0x02;
    pub const I16: u8    = 0x03;
    pub const I32: u8    = 0x04;
    pub const I64: u8    = 0x05;
    pub const U8: u8     = 0x06;
    pub const U16: u8    = 0x07;
    pub const U32: u8    = 0x08;
    pub const U64: u8    = 0x09;
    pub const F32: u8    = 0x0A;
    pub const F64: u8    = 0x0B;
    pub const TEXT: u8   = 0x0C;
    pub const SEQ: u8    = 0x0D;
    pub const RECORD: u8 = 0x0E;
}

/// Default allocation step when reading a payload of unknown remaining size.
pub const DEFAULT_READ_CHUNK: usize = 64 * 1024; // 64 KiB
/// Lower sanity bound for the read step.
pub const MIN_READ_CHUNK: usize = 4 * 1024; // 4 KiB
/// Upper sanity bound for the read step (16 MiB).
pub const MAX_READ_CHUNK: usize = 16 * 1024 * 1024;
