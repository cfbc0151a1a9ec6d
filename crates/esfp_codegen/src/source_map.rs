use esfp_ast::{Position, SyntaxTree};
use sourcemap::{SourceMap, SourceMapBuilder};

/// One generated position and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub dst_line: u32,
    pub dst_col: u32,
    /// `None` for synthetic nodes.
    pub original: Option<Position>,
}

/// Build a v3 source map with the tree's source as its only entry.
///
/// Segments without an original position are written without a source, which
/// consumers read as "no original location".
pub fn build_source_map(tree: &SyntaxTree, segments: &[Segment]) -> SourceMap {
    let mut builder = SourceMapBuilder::new(None);
    let src_id = builder.add_source(tree.source_name());
    let text = tree.source_text();
    builder.set_source_contents(src_id, Some(text));

    for segment in segments {
        match segment.original {
            Some(position) => builder.add_raw(
                segment.dst_line,
                segment.dst_col,
                position.line.saturating_sub(1) as u32,
                utf16_column(text, position.offset),
                Some(src_id),
                None,
                false,
            ),
            None => builder.add_raw(segment.dst_line, segment.dst_col, 0, 0, None, None, false),
        };
    }

    builder.into_sourcemap()
}

/// Column of byte `offset` in UTF-16 code units, the unit v3 maps count in.
fn utf16_column(text: &str, offset: usize) -> u32 {
    let offset = offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..offset].encode_utf16().count() as u32
}
