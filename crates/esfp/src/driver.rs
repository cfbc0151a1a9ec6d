//! Async driver for [`StreamAdapter`] over bounded tokio channels.
//!
//! The bounded input channel is the backpressure signal to the producer. The
//! CPU-bound finalization runs on the blocking pool so it does not stall the
//! runtime.

use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use esfp_transform::StageError;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::TransformError;
use crate::stream::{StreamAdapter, StreamEvent};

#[derive(Debug, Clone)]
pub enum StreamInput {
    Chunk(Bytes),
    /// End-of-input. Closing the channel without sending this aborts the
    /// invocation.
    End,
}

/// Feed `input` through a [`StreamAdapter`] and forward its events to `output`.
///
/// If `input` closes before [`StreamInput::End`], the buffered source is
/// dropped and nothing is emitted. Input sent after `End` is ignored. If
/// finalization panics, a single `Stage` error is emitted before the join
/// error is returned.
pub async fn drive(
    mut input: mpsc::Receiver<StreamInput>,
    output: mpsc::Sender<StreamEvent>,
    config: Arc<PipelineConfig>,
) -> Result<(), JoinError> {
    let mut adapter = StreamAdapter::new(config);

    loop {
        match input.recv().await {
            Some(StreamInput::Chunk(chunk)) => {
                if let Err(err) = adapter.on_chunk(&chunk) {
                    debug!(%err, "chunk rejected");
                }
            }
            Some(StreamInput::End) => break,
            None => {
                debug!(?adapter, "input closed before end, discarding");
                return Ok(());
            }
        }
    }
    drop(input);

    let finalized = tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        if let Err(err) = adapter.on_end(&mut events) {
            events.push(StreamEvent::Error(err.into()));
        }
        events
    })
    .await;

    let (events, outcome) = match finalized {
        Ok(events) => (events, Ok(())),
        Err(err) => {
            debug!(%err, "finalization did not complete");
            let cause = anyhow!("transform aborted: {err}");
            let event = StreamEvent::Error(TransformError::Stage(StageError::new("finalize", cause)));
            (vec![event], Err(err))
        }
    };

    for event in events {
        if output.send(event).await.is_err() {
            debug!("output receiver dropped");
            break;
        }
    }
    outcome
}

/// Channels and task handle of a spawned transform.
#[derive(Debug)]
pub struct TransformHandle {
    pub input: mpsc::Sender<StreamInput>,
    pub output: mpsc::Receiver<StreamEvent>,
    pub task: JoinHandle<Result<(), JoinError>>,
}

/// Spawn [`drive`] on the current runtime with channels of `capacity`.
pub fn spawn_transform(config: Arc<PipelineConfig>, capacity: usize) -> TransformHandle {
    let (input_tx, input_rx) = mpsc::channel(capacity);
    let (output_tx, output_rx) = mpsc::channel(capacity);
    let task = tokio::spawn(drive(input_rx, output_tx, config));
    TransformHandle {
        input: input_tx,
        output: output_rx,
        task,
    }
}
