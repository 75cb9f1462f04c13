//! value/mod.rs
//! Dynamic records whose field list is only known at run time.
//!
//! Encoding classifies each field as it is reached, so a record holding a
//! map fails with `UnsupportedFieldType` after the fields before it were
//! written, and nothing after it is. Decoding is driven by a declared
//! `TypeShape`, classified in full before any byte is read.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{DynRecord, Value};
pub use encode::{encode_field, encode_record};
pub use decode::{decode_field, decode_record};
