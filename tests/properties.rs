//! Behavioural properties of the whole pipeline: ordering, chunking, empty
//! input, failure handling, source map coverage and single emission.

use std::sync::Arc;

use anyhow::anyhow;
use esfp::{
    preset::esfp_preset, stage_fn, transform, transform_str, ErrorKind, Pipeline, PipelineConfig,
    StreamAdapter, StreamEvent, SyntaxTree,
};
use esfp_test::{run_to_string, split_at_points};
use esfp_transform::{Exponentiation, RenameIdentifier};
use proptest::prelude::*;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

const SOURCE: &str = "\
// résumé: totals per category
const rate = (x) => x ** 2;
export function summarize(items) {
    let total = 0;
    for (const item of items) {
        total += rate(item.size);
    }
    return `total: ${total} ✓`;
}
";

fn preset_config() -> PipelineConfig {
    PipelineConfig::new("summary.js")
        .with_pipeline(esfp_preset())
        .with_source_map(true)
}

/// Rewrites `square(v)` into `v ** 2`, introducing the operator that
/// [`Exponentiation`] lowers.
fn squares_to_power() -> impl esfp::TransformStage {
    struct SquareRewriter;

    impl VisitMut for SquareRewriter {
        fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
            expr.visit_mut_children_with(self);
            let ast::Expr::Call(call) = expr else {
                return;
            };
            let ast::Callee::Expr(callee) = &call.callee else {
                return;
            };
            let ast::Expr::Ident(ident) = &**callee else {
                return;
            };
            if &*ident.sym != "square" || call.args.len() != 1 {
                return;
            }
            *expr = ast::Expr::Bin(ast::BinExpr {
                span: call.span,
                op: ast::BinaryOp::Exp,
                left: call.args[0].expr.clone(),
                right: Box::new(ast::Expr::Lit(ast::Lit::Num(ast::Number {
                    span: call.span,
                    value: 2.0,
                    raw: None,
                }))),
            });
        }
    }

    stage_fn("square-to-power", |mut tree: SyntaxTree| {
        tree.module.visit_mut_with(&mut SquareRewriter);
        Ok(tree)
    })
}

fn code(config: &PipelineConfig, source: &str) -> String {
    transform_str(source, config).unwrap().code.trim().to_string()
}

#[test]
fn empty_stage_list_preserves_source() {
    let source = "const answer = compute(1, \"two\");\nexport { answer };\n";
    let config = PipelineConfig::new("identity.js");
    assert_eq!(code(&config, source), source.trim());
}

#[test]
fn stage_order_is_significant() {
    let source = "const y = square(x);";
    let introduce_then_lower = PipelineConfig::new("order.js")
        .with_stage(squares_to_power())
        .with_stage(Exponentiation);
    let lower_then_introduce = PipelineConfig::new("order.js")
        .with_stage(Exponentiation)
        .with_stage(squares_to_power());

    assert_eq!(
        code(&introduce_then_lower, source),
        "const y = Math.pow(x, 2);"
    );
    assert_eq!(code(&lower_then_introduce, source), "const y = x ** 2;");
}

#[test]
fn renames_compose_in_order() {
    let forward = PipelineConfig::new("rename.js")
        .with_stage(RenameIdentifier::new("a", "b"))
        .with_stage(RenameIdentifier::new("b", "c"));
    let backward = PipelineConfig::new("rename.js")
        .with_stage(RenameIdentifier::new("b", "c"))
        .with_stage(RenameIdentifier::new("a", "b"));
    assert_ne!(code(&forward, "a(b);"), code(&backward, "a(b);"));
    assert_eq!(code(&forward, "a(b);"), "c(c);");
    assert_eq!(code(&backward, "a(b);"), "b(c);");
}

#[test]
fn empty_input_is_a_successful_empty_result() {
    let result = transform(Vec::<&[u8]>::new(), &PipelineConfig::new("empty.js")).unwrap();
    assert_eq!(result.code, "");
    assert!(result.source_map.is_none());
}

#[test]
fn unbalanced_delimiters_emit_exactly_one_syntax_error() {
    let mut stream = StreamAdapter::new(Arc::new(preset_config()));
    stream.on_chunk(b"function broken() {\n").unwrap();
    stream.on_chunk(b"    return [1, 2;\n").unwrap();

    let mut events = Vec::new();
    stream.on_end(&mut events).unwrap();
    match &events[..] {
        [StreamEvent::Error(err)] => {
            assert_eq!(err.kind(), ErrorKind::Syntax);
            assert_eq!(err.position().map(|p| p.line), Some(2));
            assert!(err.to_string().starts_with("summary.js:2:"), "{err}");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn stage_failure_emits_no_code() {
    let config = PipelineConfig::new("a.js")
        .with_stage(Exponentiation)
        .with_stage(stage_fn("reject", |_tree| Err(anyhow!("rejected"))));
    let mut stream = StreamAdapter::new(Arc::new(config));
    stream.on_chunk(b"x ** 2;").unwrap();

    let mut events = Vec::new();
    stream.on_end(&mut events).unwrap();
    match &events[..] {
        [StreamEvent::Error(err)] => {
            assert_eq!(err.kind(), ErrorKind::Stage);
            assert_eq!(err.to_string(), "[reject] rejected");
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn source_map_distinguishes_original_and_synthetic_tokens() {
    let source = "const y = base ** exp;\n";
    let result = transform_str(source, &preset_config()).unwrap();
    assert_eq!(result.code.trim(), "const y = Math.pow(base, exp);");
    let map = result.source_map.as_ref().unwrap();

    let math = map.lookup_token(0, 10).unwrap();
    assert_eq!(math.get_source(), None);

    let base = map.lookup_token(0, 19).unwrap();
    assert_eq!(base.get_source(), Some("summary.js"));
    assert_eq!((base.get_src_line(), base.get_src_col()), (0, 10));

    let exp = map.lookup_token(0, 25).unwrap();
    assert_eq!((exp.get_src_line(), exp.get_src_col()), (0, 18));

    let y = map.lookup_token(0, 6).unwrap();
    assert_eq!((y.get_src_line(), y.get_src_col()), (0, 6));
}

#[test]
fn shared_config_serves_concurrent_invocations() {
    let config = Arc::new(preset_config());
    let expected = run_to_string(&[SOURCE.as_bytes()], &config).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let config = config.clone();
                scope.spawn(move || {
                    let bytes = SOURCE.as_bytes();
                    let chunks = split_at_points(bytes, &[i * 7, i * 13 + 1]);
                    run_to_string(&chunks, &config).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn stages_can_be_shared_between_pipelines() {
    let preset = esfp_preset();
    let reused: Pipeline = preset.stages().iter().cloned().collect();
    assert_eq!(preset.names(), reused.names());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunk_boundaries_do_not_change_output(
        points in proptest::collection::vec(0..SOURCE.len(), 0..8)
    ) {
        let config = preset_config();
        let whole = run_to_string(&[SOURCE.as_bytes()], &config).unwrap();
        let chunks = split_at_points(SOURCE.as_bytes(), &points);
        prop_assert_eq!(run_to_string(&chunks, &config).unwrap(), whole);
    }

    #[test]
    fn every_stream_emits_exactly_one_outcome(
        bytes in proptest::collection::vec(any::<u8>(), 0..48),
        points in proptest::collection::vec(0usize..48, 0..6),
        use_valid_prefix in any::<bool>(),
    ) {
        let mut input = if use_valid_prefix { b"let v = ".to_vec() } else { Vec::new() };
        input.extend_from_slice(&bytes);

        let mut stream = StreamAdapter::new(Arc::new(preset_config()));
        for chunk in split_at_points(&input, &points) {
            stream.on_chunk(chunk).unwrap();
        }
        let mut events = Vec::new();
        stream.on_end(&mut events).unwrap();

        let outcome_ok = matches!(&events[..], [StreamEvent::Data(_), StreamEvent::End]);
        let outcome_err = matches!(&events[..], [StreamEvent::Error(_)]);
        prop_assert!(outcome_ok ^ outcome_err, "events: {:?}", events);

        let mut late = Vec::new();
        prop_assert!(stream.on_end(&mut late).is_err());
        prop_assert!(late.is_empty());
    }
}
