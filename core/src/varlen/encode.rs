//! varlen/encode.rs

use std::io::Write;

use tracing::trace;

use crate::constants::MAX_PREFIX_VALUE;
use crate::io::SinkWriter;
use crate::scalar::put_scalar;
use crate::types::{MarshalError, Result};

/// Write a 4-byte big-endian length prefix.
///
/// Lengths that do not fit the prefix have no wire mapping.
pub fn put_len<W: Write>(sink: &mut SinkWriter<W>, len: usize) -> Result<()> {
    check_len(len)?;
    trace!(len, "length prefix");
    put_scalar(sink, len as u32)
}

/// Fail unless `len` fits a length prefix. Nothing is written.
#[inline]
pub fn check_len(len: usize) -> Result<()> {
    if len > MAX_PREFIX_VALUE {
        return Err(MarshalError::unsupported(format!(
            "length {} exceeds the 4-byte length prefix",
            len
        )));
    }
    Ok(())
}

/// Raw bytes with a byte-count prefix; content is written verbatim.
pub fn put_bytes<W: Write>(sink: &mut SinkWriter<W>, bytes: &[u8]) -> Result<()> {
    put_len(sink, bytes.len())?;
    sink.put(bytes)
}

#[inline]
pub fn put_text<W: Write>(sink: &mut SinkWriter<W>, text: &str) -> Result<()> {
    put_bytes(sink, text.as_bytes())
}
