use swc_common::{
    comments::SingleThreadedComments, sync::Lrc, BytePos, FileName, SourceFile, SourceMap, Span,
};
use swc_ecma_ast::Module;

use crate::Position;

/// Where a generated node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The node was parsed from the source buffer at this position.
    Source(Position),
    /// The node was created by a transform stage.
    Synthetic,
    /// The position belongs to neither the source nor the synthetic range.
    Unknown,
}

/// A parsed module owned by a single transform invocation.
///
/// Besides the module itself the tree keeps the SWC source map that the parser
/// registered the buffer in, plus a one-byte synthetic file. Stages give nodes
/// they invent the span returned by [`SyntaxTree::synthetic_span`], which lets
/// the code generator tell them apart from nodes that have a real origin.
pub struct SyntaxTree {
    pub module: Module,
    pub comments: SingleThreadedComments,
    source_name: String,
    source_map: Lrc<SourceMap>,
    source_file: Lrc<SourceFile>,
    synthetic_file: Lrc<SourceFile>,
}

impl SyntaxTree {
    pub fn new(
        module: Module,
        comments: SingleThreadedComments,
        source_name: impl Into<String>,
        source_map: Lrc<SourceMap>,
        source_file: Lrc<SourceFile>,
    ) -> Self {
        let synthetic_file = source_map.new_source_file(
            Lrc::new(FileName::Internal("esfp-synthetic".to_string())),
            " ".to_string(),
        );
        Self {
            module,
            comments,
            source_name: source_name.into(),
            source_map,
            source_file,
            synthetic_file,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The decoded text of the source buffer.
    pub fn source_text(&self) -> &str {
        &self.source_file.src
    }

    pub fn source_map(&self) -> &Lrc<SourceMap> {
        &self.source_map
    }

    /// Span for nodes that have no counterpart in the source.
    pub fn synthetic_span(&self) -> Span {
        Span::new(self.synthetic_file.start_pos, self.synthetic_file.start_pos)
    }

    pub fn is_synthetic(&self, pos: BytePos) -> bool {
        pos == self.synthetic_file.start_pos
    }

    /// Position of `pos` inside the source buffer, if it lies there.
    pub fn position(&self, pos: BytePos) -> Option<Position> {
        if pos.0 == 0
            || pos < self.source_file.start_pos
            || pos > self.source_file.end_pos
        {
            return None;
        }
        let loc = self.source_map.lookup_char_pos(pos);
        Some(Position {
            offset: (pos - self.source_file.start_pos).0 as usize,
            line: loc.line,
            column: loc.col.0,
        })
    }

    pub fn origin(&self, pos: BytePos) -> Origin {
        if self.is_synthetic(pos) {
            return Origin::Synthetic;
        }
        match self.position(pos) {
            Some(position) => Origin::Source(position),
            None => Origin::Unknown,
        }
    }

    /// Dump the module as pretty-printed JSON.
    pub fn dump_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.module)
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("source_name", &self.source_name)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}
