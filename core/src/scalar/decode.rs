//! scalar/decode.rs

use std::io::Read;

use crate::constants::widths;
use crate::io::SourceReader;
use crate::scalar::types::Scalar;
use crate::types::Result;

/// Read one fixed-width value; `TruncatedInput` if fewer than `S::WIDTH` bytes remain.
#[inline]
pub fn get_scalar<R: Read, S: Scalar>(src: &mut SourceReader<R>) -> Result<S> {
    let mut buf = [0u8; widths::MAX_SCALAR];
    let slot = &mut buf[..S::WIDTH];
    src.read_full(slot)?;
    Ok(S::read_be(slot))
}
