//! ECMAScript/TypeScript parser front end for esfp.
//!
//! Decodes a [`SourceBuffer`] as strict UTF-8 and feeds it to the standard SWC
//! parser. Failures, including errors the SWC parser would otherwise recover
//! from, become a [`SyntaxError`] positioned in the original buffer.

pub mod parse;

pub use parse::{parse, SyntaxError};
