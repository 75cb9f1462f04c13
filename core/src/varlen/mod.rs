//! varlen/mod.rs
//! Length-prefixed codec for text and sequences.
//!
//! Layout: `[u32 BE length][payload]`. For text the length is a byte count,
//! for sequences an element count; elements are then encoded one after the
//! other by the caller. The prefix is always present and always 4 bytes.

pub mod encode;
pub mod decode;

pub use encode::*;
pub use decode::*;
