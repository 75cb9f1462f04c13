//! marshal-core
//!
//! Schema-less, big-endian record codec. The wire layout is derived from the
//! declared shape of the record alone: fields in declaration order, scalars
//! at their fixed width, text and sequences behind a 4-byte length prefix,
//! nested records flattened with no delimiter. No magic, no version, no
//! type tags (unless self-description is switched on).
//!
//! ```
//! use marshal_core::{decode, encode, Record};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct Sample {
//!     num: i64,
//!     flag: bool,
//! }
//!
//! let bytes = encode(&Sample { num: 3, flag: true }).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 3, 1]);
//!
//! let mut out = Sample::default();
//! decode(&bytes, &mut out).unwrap();
//! assert_eq!(out, Sample { num: 3, flag: true });
//! ```

#![forbid(unsafe_code)]

// Lets `#[derive(Record)]` expansions resolve `::marshal_core` inside this crate.
extern crate self as marshal_core;

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod io;

// Codec layers
pub mod shape;
pub mod scalar;
pub mod varlen;
pub mod record;
pub mod value;

// Entry points
pub mod codec;

pub use codec::{
    decode, decode_from, decode_value, decode_with, encode, encode_to, encode_value, encode_with,
    CodecConfig, Decoder, Encoder,
};
pub use io::{InputSource, OutputSink, SharedBuffer};
pub use record::{Record, Wire};
pub use shape::{classify, RecordShape, TypeShape, WireKind};
pub use types::{ErrorKind, MarshalError, Result};
pub use value::{DynRecord, Value};

#[cfg(feature = "derive")]
pub use marshal_derive::Record;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{decode, encode, CodecConfig, Decoder, Encoder};
    pub use crate::record::{Record, Wire};
    pub use crate::types::{ErrorKind, MarshalError};
    pub use crate::value::{DynRecord, Value};

    #[cfg(feature = "derive")]
    pub use marshal_derive::Record;
}
