//! io.rs
//! Byte sink/source wrappers and normalised input/output selection.
//!
//! - `SinkWriter` is the append-only sink: one blocking write primitive, a
//!   byte counter, no buffering of its own.
//! - `SourceReader` is the cursor-based source: one blocking read primitive,
//!   a byte counter and, when the total length is known up front, the number
//!   of bytes still available.

use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::{MarshalError, Result};

/// Append-only byte sink.
#[derive(Debug)]
pub struct SinkWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> SinkWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Write all of `bytes` or fail; a partial write is not retracted.
    pub fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes).map_err(MarshalError::from)
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for SinkWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Cursor-based byte source.
#[derive(Debug)]
pub struct SourceReader<R> {
    inner: R,
    read: u64,
    /// Total bytes the source holds, when known.
    limit: Option<u64>,
}

impl<R: Read> SourceReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, read: 0, limit: None }
    }

    /// Source whose total length is known (in-memory buffers, regular files).
    pub fn with_len(inner: R, len: u64) -> Self {
        Self { inner, read: 0, limit: Some(len) }
    }

    /// Bytes still available, `None` for sources of unknown length.
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|l| l.saturating_sub(self.read))
    }

    pub fn bytes_read(&self) -> u64 {
        self.read
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fail early with `TruncatedInput` when the source is known to be too short.
    pub fn ensure_available(&self, need: u64) -> Result<()> {
        match self.remaining() {
            Some(have) if need > have => Err(MarshalError::TruncatedInput {
                need: clamp_usize(need),
                have: clamp_usize(have),
            }),
            _ => Ok(()),
        }
    }

    /// Fill `buf` completely.
    pub fn read_full(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_available(buf.len() as u64)?;

        let mut got = 0usize;
        while got < buf.len() {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => {
                    self.read += got as u64;
                    return Err(MarshalError::TruncatedInput { need: buf.len(), have: got });
                }
                Ok(n) => got += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    self.read += got as u64;
                    return Err(MarshalError::TruncatedInput { need: buf.len(), have: got });
                }
                Err(e) => {
                    self.read += got as u64;
                    return Err(MarshalError::UnderlyingIo(e));
                }
            }
        }
        self.read += got as u64;
        Ok(())
    }

    /// Read exactly `len` payload bytes.
    ///
    /// With a known remaining length the check happens before any allocation.
    /// Otherwise the buffer grows by at most `chunk` bytes per step, so a
    /// garbage length prefix cannot force a large up-front allocation.
    pub fn read_payload(&mut self, len: usize, chunk: usize) -> Result<Vec<u8>> {
        self.ensure_available(len as u64)?;

        if self.limit.is_some() {
            let mut out = vec![0u8; len];
            self.read_full(&mut out)?;
            return Ok(out);
        }

        let chunk = chunk.max(1);
        let mut out = Vec::with_capacity(len.min(chunk));
        while out.len() < len {
            let start = out.len();
            let step = (len - start).min(chunk);
            out.resize(start + step, 0);
            if let Err(e) = self.read_full(&mut out[start..]) {
                return Err(match e {
                    MarshalError::TruncatedInput { have, .. } => {
                        MarshalError::TruncatedInput { need: len, have: start + have }
                    }
                    other => other,
                });
            }
        }
        Ok(out)
    }
}

fn clamp_usize(v: u64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Memory,
}

/// Normalise an input source into a boxed reader plus its length when known.
pub fn open_input(src: InputSource) -> Result<(Box<dyn Read + Send>, Option<u64>)> {
    match src {
        InputSource::Reader(r) => Ok((r, None)),
        InputSource::File(p) => {
            let file = std::fs::File::open(p)?;
            let len = file.metadata()?.len();
            Ok((Box::new(file), Some(len)))
        }
        InputSource::Memory(b) => {
            let len = b.len() as u64;
            Ok((Box::new(Cursor::new(b)), Some(len)))
        }
    }
}

/// Normalise an output sink into a boxed writer.
/// A memory sink hands back the shared buffer it appends to.
pub fn open_output(sink: OutputSink) -> Result<(Box<dyn Write + Send>, Option<SharedBuffer>)> {
    match sink {
        OutputSink::Writer(w) => Ok((w, None)),
        OutputSink::File(p) => Ok((Box::new(std::fs::File::create(p)?), None)),
        OutputSink::Memory => {
            let buf = SharedBuffer::default();
            let writer = SharedBufferWriter { buf: buf.clone() };
            Ok((Box::new(writer), Some(buf)))
        }
    }
}

/// Memory sink contents, readable while the writer is still alive.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn to_vec(&self) -> Vec<u8> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SharedBufferWriter {
    buf: SharedBuffer,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "shared buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
