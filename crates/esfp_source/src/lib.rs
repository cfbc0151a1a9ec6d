//! Source accumulation for esfp.
//!
//! Input arrives as a sequence of byte chunks. [`SourceAccumulator`] appends
//! them in order, without decoding, and [`SourceAccumulator::end`] freezes the
//! result into a [`SourceBuffer`]. Chunk boundaries may fall anywhere,
//! including inside a multi-byte UTF-8 sequence.

use bytes::{Bytes, BytesMut};
use tracing::trace;

/// Protocol misuse, such as writing after end-of-input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StateError(pub &'static str);

/// The complete, immutable input of one transform invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    name: String,
    bytes: Bytes,
}

impl SourceBuffer {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Diagnostic label, usually a file name. Never read from disk.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the buffer as UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

/// Collects chunks until end-of-input.
#[derive(Debug)]
pub struct SourceAccumulator {
    name: String,
    buf: BytesMut,
    chunks: usize,
    closed: bool,
}

impl SourceAccumulator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buf: BytesMut::new(),
            chunks: 0,
            closed: false,
        }
    }

    /// Append a chunk.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), StateError> {
        if self.closed {
            return Err(StateError("accumulator closed"));
        }
        self.buf.extend_from_slice(chunk);
        self.chunks += 1;
        trace!(len = chunk.len(), total = self.buf.len(), "accumulated chunk");
        Ok(())
    }

    /// Freeze everything written so far into a [`SourceBuffer`].
    ///
    /// Zero chunks yield an empty buffer. The accumulator is closed afterwards.
    pub fn end(&mut self) -> Result<SourceBuffer, StateError> {
        if self.closed {
            return Err(StateError("accumulator closed"));
        }
        self.closed = true;
        trace!(chunks = self.chunks, len = self.buf.len(), "accumulator closed");
        Ok(SourceBuffer {
            name: std::mem::take(&mut self.name),
            bytes: std::mem::take(&mut self.buf).freeze(),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes accumulated so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
