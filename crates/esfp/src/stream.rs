//! Chunked front end over the batch transform.
//!
//! ```text
//!   Open ──on_chunk──▶ Open
//!   Open ──on_end────▶ Finalizing ──ok───▶ Closed   (Data, End)
//!                                 └─err──▶ Failed   (Error)
//! ```
//!
//! Closed and Failed are terminal. Every stream emits either `Data` followed
//! by `End`, or a single `Error`.

use std::sync::Arc;

use bytes::Bytes;
use esfp_source::{SourceAccumulator, StateError};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::TransformError;
use crate::transform::finalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Open,
    Finalizing,
    Closed,
    Failed,
}

#[derive(Debug)]
pub enum StreamEvent {
    /// The generated code, with the inline source map when enabled.
    Data(Bytes),
    End,
    Error(TransformError),
}

/// Receives the events a [`StreamAdapter`] emits.
pub trait EventSink {
    fn emit(&mut self, event: StreamEvent);
}

impl EventSink for Vec<StreamEvent> {
    fn emit(&mut self, event: StreamEvent) {
        self.push(event);
    }
}

pub struct StreamAdapter {
    config: Arc<PipelineConfig>,
    accumulator: SourceAccumulator,
    state: StreamState,
}

impl StreamAdapter {
    pub fn new(config: Arc<PipelineConfig>) -> Self {
        let accumulator = SourceAccumulator::new(config.source_name.clone());
        Self {
            config,
            accumulator,
            state: StreamState::Open,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Buffer a chunk. Never blocks and never emits.
    pub fn on_chunk(&mut self, chunk: &[u8]) -> Result<(), StateError> {
        if self.state != StreamState::Open {
            return Err(StateError("stream is not open"));
        }
        self.accumulator.write(chunk)
    }

    /// Run the transform over everything buffered and emit its outcome.
    ///
    /// Returns an error without emitting anything when the stream has
    /// already ended.
    pub fn on_end(&mut self, sink: &mut impl EventSink) -> Result<(), StateError> {
        if self.state != StreamState::Open {
            return Err(StateError("stream is not open"));
        }
        self.state = StreamState::Finalizing;
        debug!(source = %self.config.source_name, "finalizing stream");

        let outcome = self
            .accumulator
            .end()
            .map_err(TransformError::from)
            .and_then(|buffer| finalize(&buffer, &self.config))
            .and_then(|result| Ok(result.into_inline_code()?));

        match outcome {
            Ok(code) => {
                self.state = StreamState::Closed;
                debug!(source = %self.config.source_name, len = code.len(), "stream closed");
                sink.emit(StreamEvent::Data(Bytes::from(code)));
                sink.emit(StreamEvent::End);
            }
            Err(err) => {
                self.state = StreamState::Failed;
                debug!(source = %self.config.source_name, kind = ?err.kind(), %err, "stream failed");
                sink.emit(StreamEvent::Error(err));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for StreamAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamAdapter")
            .field("source_name", &self.config.source_name)
            .field("buffered", &self.accumulator.len())
            .field("state", &self.state)
            .finish()
    }
}
