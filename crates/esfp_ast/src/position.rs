use std::fmt;

use serde::{Deserialize, Serialize};

/// A location inside a source buffer.
///
/// `line` is 1-based, `column` is a 0-based count of characters from the start
/// of the line, and `offset` is the byte offset from the start of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Compute the position of byte `offset` in `text`.
    ///
    /// `offset` is clamped to the text length and rounded down to a character
    /// boundary.
    pub fn at_offset(text: &str, offset: usize) -> Self {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let prefix = &text[..offset];
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            offset,
            line: prefix.matches('\n').count() + 1,
            column: prefix[line_start..].chars().count(),
        }
    }
}

impl fmt::Display for Position {
    /// Renders as `line:column` with a 1-based column, the way editors show it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}
