//! codec.rs
//! Encoder / Decoder and the public entry points.
//!
//! An `Encoder` owns one sink, a `Decoder` one source. Each call drives one
//! depth-first traversal of a record; nothing survives between calls except
//! the wrapped stream handle. Neither type is meant to be shared between
//! threads while a call is in flight; two instances on two independent
//! streams need no coordination.

use std::any::type_name;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{DEFAULT_READ_CHUNK, MAX_NESTING_DEPTH, MAX_ZERO_WIDTH_SEQ, TAG_LEN};
use crate::io::{open_input, open_output, InputSource, OutputSink, SharedBuffer, SinkWriter, SourceReader};
use crate::record::{Record, Wire};
use crate::scalar::{get_scalar, put_scalar, Scalar};
use crate::shape::{classify, TypeShape, WireKind};
use crate::types::{MarshalError, Result};
use crate::utils::best_read_chunk;
use crate::value::{self, Value};
use crate::varlen::{check_len, check_seq_count, get_len, get_text, put_len, put_text, seq_capacity};

/// Codec options carried by every encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Prefix every value with a one-byte kind tag and verify it on decode.
    /// Off by default; the default wire format carries no type information.
    pub self_describing: bool,

    /// Largest single allocation step while reading a payload from a source
    /// of unknown length.
    pub read_chunk: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            self_describing: false,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}

impl CodecConfig {
    pub fn self_describing() -> Self {
        Self { self_describing: true, ..Self::default() }
    }

    pub fn with_read_chunk(self, read_chunk: usize) -> Self {
        Self { read_chunk, ..self }
    }

    /// Clamp `read_chunk` into its sane range (zero means default).
    pub fn normalized(self) -> Self {
        Self { read_chunk: best_read_chunk(self.read_chunk), ..self }
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

pub struct Encoder<W> {
    sink: SinkWriter<W>,
    config: CodecConfig,
}

impl<W: Write> Encoder<W> {
    pub fn new(sink: W) -> Self {
        Self::with_config(sink, CodecConfig::default())
    }

    pub fn with_config(sink: W, config: CodecConfig) -> Self {
        Self { sink: SinkWriter::new(sink), config: config.normalized() }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode one record. On error the sink holds whatever was written up to
    /// the failing field and must be discarded.
    pub fn encode<T: Record>(&mut self, value: &T) -> Result<()> {
        let start = self.sink.bytes_written();
        debug!(record = type_name::<T>(), self_describing = self.config.self_describing, "encode start");

        let res = self.write_record(value);
        self.log_outcome("encode", start, &res);
        res
    }

    /// Encode a dynamic value; it must be a record.
    pub fn encode_value(&mut self, value: &Value) -> Result<()> {
        let start = self.sink.bytes_written();
        let res = match value.as_record() {
            Some(record) => {
                debug!(record = %record.name, fields = record.len(), "encode start");
                value::encode_record(self, record)
            }
            None => Err(MarshalError::InvalidType(format!(
                "expected a record, got {}",
                value.category()
            ))),
        };
        self.log_outcome("encode", start, &res);
        res
    }

    fn log_outcome(&self, op: &str, start: u64, res: &Result<()>) {
        let bytes = self.sink.bytes_written() - start;
        match res {
            Ok(()) => debug!(op, bytes, "done"),
            Err(e) => debug!(op, bytes, error = %e, "aborted"),
        }
    }

    // --- building blocks for `Wire` impls and dynamic values ---

    /// Kind tag, only written in self-describing mode.
    #[inline]
    pub fn write_tag(&mut self, kind: WireKind) -> Result<()> {
        if self.config.self_describing {
            put_scalar(&mut self.sink, kind.tag())
        } else {
            Ok(())
        }
    }

    #[inline]
    pub fn write_scalar<S: Scalar>(&mut self, v: S) -> Result<()> {
        self.write_tag(S::KIND)?;
        put_scalar(&mut self.sink, v)
    }

    pub fn write_text(&mut self, text: &str) -> Result<()> {
        check_len(text.len())?;
        self.write_tag(WireKind::Text)?;
        put_text(&mut self.sink, text)
    }

    /// Tag (if any) and element count; the caller encodes the elements.
    /// A count that does not fit the prefix fails before anything is written.
    pub fn begin_seq(&mut self, len: usize) -> Result<()> {
        check_len(len)?;
        self.write_tag(WireKind::Seq)?;
        put_len(&mut self.sink, len)
    }

    /// Sequences of zero-width elements are capped at `MAX_ZERO_WIDTH_SEQ`
    /// in the untagged format, the same limit the decoder enforces.
    pub fn write_seq<T: Wire>(&mut self, items: &[T]) -> Result<()> {
        if T::MIN_WIRE_LEN == 0 && !self.config.self_describing && items.len() > MAX_ZERO_WIDTH_SEQ {
            return Err(MarshalError::unsupported(format!(
                "sequence of {} zero-width elements exceeds {}",
                items.len(),
                MAX_ZERO_WIDTH_SEQ
            )));
        }
        self.begin_seq(items.len())?;
        for item in items {
            item.encode_wire(self)?;
        }
        Ok(())
    }

    /// Nested records are flattened into the same sink with no delimiter.
    pub fn write_record<T: Record>(&mut self, value: &T) -> Result<()> {
        self.write_tag(WireKind::Record)?;
        value.encode_fields(self)
    }

    pub fn bytes_written(&self) -> u64 {
        self.sink.bytes_written()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(MarshalError::from)
    }

    pub fn get_ref(&self) -> &W {
        self.sink.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl Encoder<Box<dyn Write + Send>> {
    /// Encoder over a normalised output; a memory sink hands back its buffer.
    pub fn from_sink(sink: OutputSink, config: CodecConfig) -> Result<(Self, Option<SharedBuffer>)> {
        let (writer, maybe_buf) = open_output(sink)?;
        Ok((Self::with_config(writer, config), maybe_buf))
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

pub struct Decoder<R> {
    src: SourceReader<R>,
    config: CodecConfig,
    /// Records currently open on the traversal stack.
    depth: usize,
}

impl<R: Read> Decoder<R> {
    /// Decoder over a source of unknown length.
    pub fn new(source: R) -> Self {
        Self::with_config(source, CodecConfig::default())
    }

    pub fn with_config(source: R, config: CodecConfig) -> Self {
        Self { src: SourceReader::new(source), config: config.normalized(), depth: 0 }
    }

    /// Decoder over a source known to hold exactly `len` more bytes; length
    /// prefixes are checked against it before anything is read.
    pub fn with_known_len(source: R, len: u64, config: CodecConfig) -> Self {
        Self { src: SourceReader::with_len(source, len), config: config.normalized(), depth: 0 }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode into a caller-declared record, field by field in declared order.
    /// On error `dest` may be partially overwritten and must be discarded.
    pub fn decode<T: Record>(&mut self, dest: &mut T) -> Result<()> {
        let start = self.src.bytes_read();
        debug!(record = type_name::<T>(), remaining = ?self.src.remaining(), "decode start");

        let res = self.read_record(dest);
        self.log_outcome("decode", start, &res);
        res
    }

    /// Decode a dynamic record of the given shape. The shape is classified
    /// in full before the first byte is read.
    pub fn decode_value(&mut self, shape: &TypeShape) -> Result<Value> {
        let record = match shape {
            TypeShape::Record(record) => record,
            other => {
                return Err(MarshalError::InvalidType(format!(
                    "decode destination must be a record, got {}",
                    other
                )))
            }
        };
        classify(shape)?;

        let start = self.src.bytes_read();
        debug!(record = %record.name, fields = record.len(), "decode start");
        let res = value::decode_record(self, record);
        let bytes = self.src.bytes_read() - start;
        match &res {
            Ok(_) => debug!(op = "decode", bytes, "done"),
            Err(e) => debug!(op = "decode", bytes, error = %e, "aborted"),
        }
        res.map(Value::Record)
    }

    fn log_outcome(&self, op: &str, start: u64, res: &Result<()>) {
        let bytes = self.src.bytes_read() - start;
        match res {
            Ok(()) => debug!(op, bytes, "done"),
            Err(e) => debug!(op, bytes, error = %e, "aborted"),
        }
    }

    // --- building blocks for `Wire` impls and dynamic values ---

    /// Verify the kind tag in self-describing mode; no-op otherwise.
    #[inline]
    pub fn expect_tag(&mut self, expected: WireKind) -> Result<()> {
        if !self.config.self_describing {
            return Ok(());
        }
        let found: u8 = get_scalar(&mut self.src)?;
        if found != expected.tag() {
            return Err(MarshalError::ShapeMismatch { expected, found });
        }
        Ok(())
    }

    #[inline]
    pub fn read_scalar<S: Scalar>(&mut self) -> Result<S> {
        self.expect_tag(S::KIND)?;
        get_scalar(&mut self.src)
    }

    pub fn read_text(&mut self) -> Result<String> {
        self.expect_tag(WireKind::Text)?;
        get_text(&mut self.src, self.config.read_chunk)
    }

    /// Tag (if any) and element count, checked against the remaining input
    /// using the smallest wire size an element can have.
    pub fn begin_seq(&mut self, min_elem_len: usize) -> Result<usize> {
        self.expect_tag(WireKind::Seq)?;
        let count = get_len(&mut self.src)?;
        check_seq_count(&self.src, count, self.elem_floor(min_elem_len))?;
        Ok(count)
    }

    /// Preallocation for `count` elements, bounded by what the source can deliver.
    pub fn seq_capacity(&self, count: usize, min_elem_len: usize) -> usize {
        seq_capacity(&self.src, count, self.elem_floor(min_elem_len), self.config.read_chunk)
    }

    /// In tagged mode every element carries at least its tag byte.
    fn elem_floor(&self, min_elem_len: usize) -> usize {
        if self.config.self_describing {
            min_elem_len + TAG_LEN
        } else {
            min_elem_len
        }
    }

    /// Each element is decoded into a fresh default value, then appended.
    pub fn read_seq<T: Wire + Default>(&mut self) -> Result<Vec<T>> {
        let count = self.begin_seq(T::MIN_WIRE_LEN)?;
        let mut out = Vec::with_capacity(self.seq_capacity(count, T::MIN_WIRE_LEN));
        for _ in 0..count {
            let mut elem = T::default();
            elem.decode_wire(self)?;
            out.push(elem);
        }
        Ok(out)
    }

    pub fn read_record<T: Record>(&mut self, dest: &mut T) -> Result<()> {
        self.enter_record()?;
        let res = match self.expect_tag(WireKind::Record) {
            Ok(()) => dest.decode_fields(self),
            Err(e) => Err(e),
        };
        self.leave_record();
        res
    }

    /// Open one more nesting level; input nested deeper than
    /// `MAX_NESTING_DEPTH` records is rejected instead of exhausting the stack.
    pub(crate) fn enter_record(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(MarshalError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_record(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Bytes left in the source, when its length is known.
    pub fn remaining(&self) -> Option<u64> {
        self.src.remaining()
    }

    pub fn bytes_read(&self) -> u64 {
        self.src.bytes_read()
    }

    pub fn get_ref(&self) -> &R {
        self.src.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.src.into_inner()
    }
}

impl<'a> Decoder<&'a [u8]> {
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self::from_slice_with_config(bytes, CodecConfig::default())
    }

    pub fn from_slice_with_config(bytes: &'a [u8], config: CodecConfig) -> Self {
        Self::with_known_len(bytes, bytes.len() as u64, config)
    }
}

impl Decoder<Box<dyn Read + Send>> {
    /// Decoder over a normalised input; files and memory report their length.
    pub fn from_source(source: InputSource, config: CodecConfig) -> Result<Self> {
        let (reader, len) = open_input(source)?;
        Ok(match len {
            Some(len) => Self::with_known_len(reader, len, config),
            None => Self::with_config(reader, config),
        })
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Encode a record into a fresh buffer.
pub fn encode<T: Record>(value: &T) -> Result<Vec<u8>> {
    encode_with(value, CodecConfig::default())
}

pub fn encode_with<T: Record>(value: &T, config: CodecConfig) -> Result<Vec<u8>> {
    let mut enc = Encoder::with_config(Vec::new(), config);
    enc.encode(value)?;
    Ok(enc.into_inner())
}

/// Encode a record straight into a sink (pass `&mut w` to keep the writer).
pub fn encode_to<T: Record, W: Write>(value: &T, sink: W) -> Result<()> {
    Encoder::new(sink).encode(value)
}

/// Decode a record from an in-memory buffer. Trailing bytes are left unread.
pub fn decode<T: Record>(bytes: &[u8], dest: &mut T) -> Result<()> {
    decode_with(bytes, dest, CodecConfig::default())
}

pub fn decode_with<T: Record>(bytes: &[u8], dest: &mut T, config: CodecConfig) -> Result<()> {
    Decoder::from_slice_with_config(bytes, config).decode(dest)
}

/// Decode a record straight from a source (pass `&mut r` to keep the reader).
pub fn decode_from<T: Record, R: Read>(source: R, dest: &mut T) -> Result<()> {
    Decoder::new(source).decode(dest)
}

pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut enc = Encoder::new(Vec::new());
    enc.encode_value(value)?;
    Ok(enc.into_inner())
}

pub fn decode_value(bytes: &[u8], shape: &TypeShape) -> Result<Value> {
    Decoder::from_slice(bytes).decode_value(shape)
}
