//! scalar/encode.rs

use std::io::Write;

use crate::io::SinkWriter;
use crate::scalar::types::Scalar;
use crate::types::{MarshalError, Result};

/// Append the big-endian image of `v` to the sink.
#[inline]
pub fn put_scalar<W: Write, S: Scalar>(sink: &mut SinkWriter<W>, v: S) -> Result<()> {
    v.write_be(sink).map_err(MarshalError::from)
}
