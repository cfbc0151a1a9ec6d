//! Code generation for esfp.
//!
//! Prints a [`SyntaxTree`](esfp_ast::SyntaxTree) with the SWC emitter in its
//! fixed, non-minified style: four-space indentation, `\n` line endings,
//! comments kept. Optionally records a source map from generated positions
//! back to the source buffer.

pub mod generate;
pub mod source_map;

pub use generate::{generate, GenerateError, TransformResult};
