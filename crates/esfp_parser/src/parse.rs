use esfp_ast::{EsfpSyntax, Position, SyntaxTree};
use esfp_source::SourceBuffer;
use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceFile, SourceMap, Spanned};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};
use tracing::debug;

/// The source buffer could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_name}:{position}: {message}")]
pub struct SyntaxError {
    pub source_name: String,
    pub message: String,
    pub position: Position,
}

/// Parse a source buffer into a [`SyntaxTree`].
pub fn parse(buffer: &SourceBuffer, syntax: &EsfpSyntax) -> Result<SyntaxTree, SyntaxError> {
    let text = buffer.text().map_err(|err| {
        let prefix = std::str::from_utf8(&buffer.bytes()[..err.valid_up_to()]).unwrap_or_default();
        SyntaxError {
            source_name: buffer.name().to_string(),
            message: "source is not valid UTF-8".to_string(),
            position: Position::at_offset(prefix, prefix.len()),
        }
    })?;

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(buffer.name().to_string())),
        text.to_string(),
    );

    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    debug!(source = buffer.name(), len = text.len(), ?syntax, "parsing source");

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        swc_syntax(syntax),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| syntax_error(buffer.name(), text, &source_file, &e))?;

    if let Some(e) = recovered.first() {
        return Err(syntax_error(buffer.name(), text, &source_file, e));
    }

    Ok(SyntaxTree::new(
        module,
        comments,
        buffer.name(),
        source_map,
        source_file,
    ))
}

fn swc_syntax(syntax: &EsfpSyntax) -> Syntax {
    if syntax.typescript {
        Syntax::Typescript(TsSyntax {
            tsx: syntax.jsx,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: syntax.jsx,
            ..Default::default()
        })
    }
}

fn syntax_error(
    source_name: &str,
    text: &str,
    source_file: &SourceFile,
    err: &swc_ecma_parser::error::Error,
) -> SyntaxError {
    let lo = err.span().lo;
    let offset = lo.0.saturating_sub(source_file.start_pos.0) as usize;
    let error = SyntaxError {
        source_name: source_name.to_string(),
        message: err.kind().msg().into_owned(),
        position: Position::at_offset(text, offset),
    };
    debug!(%error, "parse failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(name: &str, text: &str) -> SourceBuffer {
        SourceBuffer::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn parses_module_items() {
        let tree = parse(
            &buffer("a.js", "import x from 'x';\nexport const y = x + 1;\n"),
            &EsfpSyntax::default(),
        )
        .unwrap();
        assert_eq!(tree.module.body.len(), 2);
        assert_eq!(tree.source_name(), "a.js");
    }

    #[test]
    fn empty_source_is_an_empty_module() {
        let tree = parse(&buffer("empty.js", ""), &EsfpSyntax::default()).unwrap();
        assert!(tree.module.body.is_empty());
    }

    #[test]
    fn reports_line_of_syntax_error() {
        let err = parse(
            &buffer("bad.js", "let a = 1;\nfoo(;\n"),
            &EsfpSyntax::default(),
        )
        .unwrap_err();
        assert_eq!(err.source_name, "bad.js");
        assert_eq!(err.position.line, 2);
        assert!(err.to_string().starts_with("bad.js:2:"));
    }

    #[test]
    fn unbalanced_delimiters_fail() {
        let result = parse(
            &buffer("bad.js", "function f() {\n  return [1, 2;\n"),
            &EsfpSyntax::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_utf8_is_positioned() {
        let mut bytes = b"let a = 1;\nlet b = \"".to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(b"\";\n");
        let err = parse(&SourceBuffer::new("bin.js", bytes), &EsfpSyntax::default()).unwrap_err();
        assert_eq!(err.position.line, 2);
        assert_eq!(err.position.column, 9);
        assert_eq!(err.position.offset, 20);
    }

    #[test]
    fn typescript_needs_typescript_syntax() {
        let source = "const n: number = 1;\n";
        assert!(parse(&buffer("a.js", source), &EsfpSyntax::default()).is_err());
        assert!(parse(&buffer("a.ts", source), &EsfpSyntax::for_source_name("a.ts")).is_ok());
    }
}
