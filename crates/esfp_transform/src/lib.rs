//! AST-to-AST transforms for esfp.
//!
//! A [`Pipeline`] is an ordered list of [`TransformStage`] trait objects. It
//! parses a source buffer and threads the tree through every stage in order,
//! stopping at the first failure.
//!
//! Built-in stages:
//! - [`ArrowFunctions`]:   `(x) => x * 2`  → `function(x) { return x * 2; }`
//! - [`TemplateLiterals`]: `` `a${b}` ``   → `"a" + b`
//! - [`Exponentiation`]:   `a ** b`        → `Math.pow(a, b)`
//! - [`RenameIdentifier`]: module-wide identifier rename
//!
//! [`preset::esfp_preset`] bundles the first three in that order.

pub mod arrow;
pub mod exponent;
pub mod pipeline;
pub mod preset;
pub mod rename;
pub mod stage;
pub mod template;

mod synth;

pub use arrow::ArrowFunctions;
pub use exponent::Exponentiation;
pub use pipeline::{Pipeline, PipelineError};
pub use rename::RenameIdentifier;
pub use stage::{stage_fn, FnStage, StageError, TransformStage};
pub use template::TemplateLiterals;
