use base64::{engine::general_purpose::STANDARD, Engine as _};
use esfp_ast::{Origin, SyntaxTree};
use sourcemap::SourceMap;
use swc_common::comments::Comments;
use swc_ecma_ast::EsVersion;
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use tracing::debug;

use crate::source_map::{build_source_map, Segment};

/// Code emission or source map serialization failed.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to emit code: {0}")]
    Emit(#[from] std::io::Error),
    #[error("emitted code is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to serialize source map: {0}")]
    SourceMap(#[from] sourcemap::Error),
}

/// Output of one transform invocation.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub code: String,
    /// Present only when a source map was requested.
    pub source_map: Option<SourceMap>,
}

impl TransformResult {
    /// The source map as JSON, if there is one.
    pub fn source_map_json(&self) -> Result<Option<String>, GenerateError> {
        let Some(map) = &self.source_map else {
            return Ok(None);
        };
        let mut json = vec![];
        map.to_writer(&mut json)?;
        Ok(Some(String::from_utf8(json)?))
    }

    /// The code with the source map appended as a base64 data URL comment.
    ///
    /// Without a source map this is just the code.
    pub fn into_inline_code(self) -> Result<String, GenerateError> {
        let Some(json) = self.source_map_json()? else {
            return Ok(self.code);
        };
        let mut code = self.code;
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str("//# sourceMappingURL=data:application/json;charset=utf-8;base64,");
        code.push_str(&STANDARD.encode(json));
        code.push('\n');
        Ok(code)
    }
}

/// Print `tree` as source text.
///
/// With `emit_source_map` set, every position the emitter marks for a node
/// parsed from the source maps back to that node's original line and column,
/// and every position marked for a synthetic node maps to no source.
pub fn generate(tree: &SyntaxTree, emit_source_map: bool) -> Result<TransformResult, GenerateError> {
    let mut buf = Vec::new();
    let mut srcmap_buf = if emit_source_map { Some(vec![]) } else { None };
    {
        let writer = JsWriter::new(tree.source_map().clone(), "\n", &mut buf, srcmap_buf.as_mut());
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(EsVersion::latest()),
            cm: tree.source_map().clone(),
            comments: Some(&tree.comments as &dyn Comments),
            wr: writer,
        };
        tree.module.emit_with(&mut emitter)?;
    }

    let code = String::from_utf8(buf)?;

    let source_map = srcmap_buf.map(|marks| {
        let mut segments: Vec<Segment> = Vec::with_capacity(marks.len());
        for (pos, line_col) in &marks {
            let original = match tree.origin(*pos) {
                Origin::Source(position) => Some(position),
                Origin::Synthetic => None,
                Origin::Unknown => continue,
            };
            let segment = Segment {
                dst_line: line_col.line,
                dst_col: line_col.col,
                original,
            };
            // Nodes starting at the same place are marked outermost first.
            match segments.last_mut() {
                Some(last) if last.dst_line == segment.dst_line && last.dst_col == segment.dst_col => {
                    *last = segment;
                }
                _ => segments.push(segment),
            }
        }
        build_source_map(tree, &segments)
    });

    debug!(
        source = tree.source_name(),
        len = code.len(),
        source_map = source_map.is_some(),
        "generated code"
    );

    Ok(TransformResult { code, source_map })
}
