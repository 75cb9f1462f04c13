//! varlen/decode.rs

use std::io::Read;

use tracing::{trace, warn};

use crate::constants::MAX_ZERO_WIDTH_SEQ;
use crate::io::SourceReader;
use crate::scalar::get_scalar;
use crate::types::{MarshalError, Result};
use crate::utils::fmt_bytes;

/// Read a 4-byte big-endian length prefix.
pub fn get_len<R: Read>(src: &mut SourceReader<R>) -> Result<usize> {
    let len = get_scalar::<_, u32>(src)? as usize;
    trace!(len, "length prefix");
    Ok(len)
}

/// Read a byte-count-prefixed payload.
///
/// A prefix larger than the known remaining input is rejected before any
/// allocation; for sources of unknown length the payload is read in steps of
/// at most `chunk` bytes.
pub fn get_bytes<R: Read>(src: &mut SourceReader<R>, chunk: usize) -> Result<Vec<u8>> {
    let len = get_len(src)?;
    check_available(src, len as u64, "text")?;
    let bytes = src.read_payload(len, chunk)?;
    trace!(len, payload = %fmt_bytes(&bytes, 16), "payload");
    Ok(bytes)
}

pub fn get_text<R: Read>(src: &mut SourceReader<R>, chunk: usize) -> Result<String> {
    let bytes = get_bytes(src, chunk)?;
    String::from_utf8(bytes).map_err(|e| MarshalError::InvalidText { len: e.as_bytes().len() })
}

/// Reject an element count that cannot fit in the remaining input, given the
/// smallest wire size an element can have.
///
/// Elements that occupy no bytes cannot be checked against the input, so
/// their count is capped at `MAX_ZERO_WIDTH_SEQ`; past it the error carries
/// element counts rather than byte counts.
pub fn check_seq_count<R: Read>(src: &SourceReader<R>, count: usize, min_elem_len: usize) -> Result<()> {
    if min_elem_len == 0 {
        if count > MAX_ZERO_WIDTH_SEQ {
            warn!(
                count,
                limit = MAX_ZERO_WIDTH_SEQ,
                offset = src.bytes_read(),
                "zero-width element count over limit; encode and decode shapes may disagree"
            );
            return Err(MarshalError::TruncatedInput { need: count, have: MAX_ZERO_WIDTH_SEQ });
        }
        return Ok(());
    }
    let need = (count as u64).saturating_mul(min_elem_len as u64);
    check_available(src, need, "sequence")
}

/// Initial capacity for a sequence of `count` elements, bounded by what the
/// source can actually deliver.
pub fn seq_capacity<R: Read>(
    src: &SourceReader<R>,
    count: usize,
    min_elem_len: usize,
    chunk: usize,
) -> usize {
    let bound = match src.remaining() {
        Some(rem) => usize::try_from(rem / min_elem_len.max(1) as u64).unwrap_or(usize::MAX),
        None => chunk,
    };
    count.min(bound)
}

fn check_available<R: Read>(src: &SourceReader<R>, need: u64, what: &str) -> Result<()> {
    src.ensure_available(need).map_err(|e| {
        warn!(
            what,
            need,
            remaining = ?src.remaining(),
            offset = src.bytes_read(),
            "length prefix exceeds remaining input; encode and decode shapes may disagree"
        );
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use crate::types::ErrorKind;

    fn source(bytes: &[u8]) -> SourceReader<Cursor<Vec<u8>>> {
        SourceReader::with_len(Cursor::new(bytes.to_vec()), bytes.len() as u64)
    }

    #[test]
    fn reads_prefixed_text() {
        let mut src = source(&[0, 0, 0, 2, 0x67, 0x6F, 0xAA]);
        assert_eq!(get_text(&mut src, 4096).unwrap(), "go");
        assert_eq!(src.remaining(), Some(1));
    }

    #[test]
    fn garbage_prefix_is_truncated_not_allocated() {
        let mut src = source(&[0xFF, 0xFF, 0xFF, 0xF0, 1, 2]);
        match get_bytes(&mut src, 4096).unwrap_err() {
            MarshalError::TruncatedInput { need, have } => {
                assert_eq!(need, 0xFFFF_FFF0);
                assert_eq!(have, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unknown_length_source_still_detects_short_payload() {
        let mut src = SourceReader::new(Cursor::new(vec![0, 0, 0, 9, b'a', b'b']));
        let err = get_bytes(&mut src, 4096).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn non_utf8_text_is_rejected() {
        let mut src = source(&[0, 0, 0, 2, 0xC3, 0x28]);
        let err = get_text(&mut src, 4096).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidText);
    }

    #[test]
    fn seq_count_is_checked_against_element_width() {
        let src = source(&[0u8; 8]);
        assert!(check_seq_count(&src, 2, 4).is_ok());
        assert!(check_seq_count(&src, 3, 4).unwrap_err().is_truncated());
        assert_eq!(seq_capacity(&src, 1_000_000, 4, 4096), 2);
    }

    #[test]
    fn zero_width_seq_count_is_capped() {
        let known = source(&[]);
        assert!(check_seq_count(&known, MAX_ZERO_WIDTH_SEQ, 0).is_ok());
        assert!(check_seq_count(&known, MAX_ZERO_WIDTH_SEQ + 1, 0).unwrap_err().is_truncated());

        let unknown = SourceReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(check_seq_count(&unknown, u32::MAX as usize, 0).unwrap_err().is_truncated());
    }
}
