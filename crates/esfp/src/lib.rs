//! esfp: a streaming source-to-source transform.
//!
//! Input arrives as byte chunks. At end-of-input the accumulated source is
//! parsed, threaded through an ordered list of transform stages and printed
//! back out, optionally with an inline source map. The caller receives either
//! one chunk of code followed by an end marker, or exactly one error.
//!
//! - [`transform`] / [`transform_str`]: one-shot, for callers holding the input
//! - [`StreamAdapter`]: the synchronous chunk/end state machine
//! - [`drive`] / [`spawn_transform`]: the same over bounded tokio channels

pub mod config;
pub mod driver;
pub mod error;
pub mod stream;
pub mod transform;

pub use config::{Flags, PipelineConfig, TransformOptions};
pub use driver::{drive, spawn_transform, StreamInput, TransformHandle};
pub use error::{ErrorKind, TransformError};
pub use stream::{EventSink, StreamAdapter, StreamEvent, StreamState};
pub use transform::{transform, transform_str};

pub use esfp_ast::{EsfpSyntax, Position, SyntaxTree};
pub use esfp_codegen::TransformResult;
pub use esfp_transform::{preset, stage_fn, Pipeline, StageError, TransformStage};
