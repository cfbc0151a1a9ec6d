//! Syntax model for esfp.
//!
//! Re-exports the standard SWC AST and adds what a transform invocation needs
//! on top of it:
//! - [`SyntaxTree`], the parsed module together with the position tables that
//!   map nodes back to the original source
//! - [`Position`], a location inside a source buffer
//! - [`EsfpSyntax`], the dialect flags handed to the parser

pub use swc_ecma_ast::*;

mod position;
mod tree;

pub use position::Position;
pub use tree::{Origin, SyntaxTree};

use serde::{Deserialize, Serialize};

/// Dialect flags controlling how a source buffer is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EsfpSyntax {
    /// Parse TypeScript instead of plain ECMAScript.
    pub typescript: bool,
    /// Accept JSX elements.
    pub jsx: bool,
}

impl EsfpSyntax {
    /// Infer the dialect from a file name's extension.
    ///
    /// `.ts` selects TypeScript, `.tsx` TypeScript with JSX, `.jsx` ECMAScript
    /// with JSX. Anything else, including names without an extension, is plain
    /// ECMAScript.
    pub fn for_source_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "ts" | "mts" | "cts" => Self {
                typescript: true,
                jsx: false,
            },
            "tsx" => Self {
                typescript: true,
                jsx: true,
            },
            "jsx" => Self {
                typescript: false,
                jsx: true,
            },
            _ => Self::default(),
        }
    }
}
