//! Lowering for arrow functions.
//!
//! `(x) => x * 2` → `function(x) { return x * 2; }`
//!
//! Only arrows that do not depend on their enclosing function's `this`,
//! `arguments`, `super` or `new.target` are rewritten. Anything that does is
//! kept as an arrow, including arrows that merely contain such an arrow.

use esfp_ast::SyntaxTree;
use swc_common::{Span, Spanned};
use swc_ecma_ast as ast;
use swc_ecma_visit::{Visit, VisitMut, VisitMutWith, VisitWith};

use crate::stage::{StageError, TransformStage};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowFunctions;

impl TransformStage for ArrowFunctions {
    fn name(&self) -> &str {
        "arrow-functions"
    }

    fn transform(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        let mut rewriter = ArrowRewriter {
            synthetic: tree.synthetic_span(),
        };
        tree.module.visit_mut_with(&mut rewriter);
        Ok(tree)
    }
}

struct ArrowRewriter {
    synthetic: Span,
}

impl VisitMut for ArrowRewriter {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        expr.visit_mut_children_with(self);

        let ast::Expr::Arrow(arrow) = expr else {
            return;
        };
        if uses_enclosing_scope(arrow) {
            return;
        }

        *expr = ast::Expr::Fn(ast::FnExpr {
            ident: None,
            function: Box::new(to_function(arrow, self.synthetic)),
        });
    }

    // A statement cannot start with `function` unless it is a declaration.
    fn visit_mut_expr_stmt(&mut self, stmt: &mut ast::ExprStmt) {
        stmt.visit_mut_children_with(self);

        if starts_with_function(&stmt.expr) {
            let expr = stmt.expr.clone();
            stmt.expr = Box::new(ast::Expr::Paren(ast::ParenExpr {
                span: self.synthetic,
                expr,
            }));
        }
    }
}

/// Whether printing `expr` begins with a function expression.
fn starts_with_function(expr: &ast::Expr) -> bool {
    match expr {
        ast::Expr::Fn(_) => true,
        ast::Expr::Seq(seq) => seq.exprs.first().is_some_and(|first| starts_with_function(first)),
        ast::Expr::Bin(bin) => starts_with_function(&bin.left),
        ast::Expr::Cond(cond) => starts_with_function(&cond.test),
        ast::Expr::Member(member) => starts_with_function(&member.obj),
        ast::Expr::TaggedTpl(tagged) => starts_with_function(&tagged.tag),
        ast::Expr::Update(update) if !update.prefix => starts_with_function(&update.arg),
        ast::Expr::Call(call) => match &call.callee {
            ast::Callee::Expr(callee) => starts_with_function(callee),
            _ => false,
        },
        _ => false,
    }
}

fn to_function(arrow: &ast::ArrowExpr, synthetic: Span) -> ast::Function {
    let body = match &*arrow.body {
        ast::BlockStmtOrExpr::BlockStmt(block) => block.clone(),
        ast::BlockStmtOrExpr::Expr(expr) => ast::BlockStmt {
            span: synthetic,
            ctxt: Default::default(),
            stmts: vec![ast::Stmt::Return(ast::ReturnStmt {
                span: synthetic,
                arg: Some(expr.clone()),
            })],
        },
    };

    ast::Function {
        params: arrow
            .params
            .iter()
            .map(|pat| ast::Param {
                span: pat.span(),
                decorators: vec![],
                pat: pat.clone(),
            })
            .collect(),
        decorators: vec![],
        span: arrow.span,
        ctxt: arrow.ctxt,
        body: Some(body),
        is_generator: false,
        is_async: arrow.is_async,
        type_params: arrow.type_params.clone(),
        return_type: arrow.return_type.clone(),
    }
}

fn uses_enclosing_scope(arrow: &ast::ArrowExpr) -> bool {
    let mut finder = ScopeUseFinder { found: false };
    arrow.visit_children_with(&mut finder);
    finder.found
}

/// Looks for lexically inherited bindings, stopping at `function` boundaries.
struct ScopeUseFinder {
    found: bool,
}

impl Visit for ScopeUseFinder {
    fn visit_this_expr(&mut self, _: &ast::ThisExpr) {
        self.found = true;
    }

    fn visit_super(&mut self, _: &ast::Super) {
        self.found = true;
    }

    fn visit_meta_prop_expr(&mut self, meta: &ast::MetaPropExpr) {
        if meta.kind == ast::MetaPropKind::NewTarget {
            self.found = true;
        }
    }

    fn visit_ident(&mut self, ident: &ast::Ident) {
        if &*ident.sym == "arguments" {
            self.found = true;
        }
    }

    fn visit_function(&mut self, _: &ast::Function) {}
}

#[cfg(test)]
mod tests {
    use esfp_ast::EsfpSyntax;
    use esfp_source::SourceBuffer;

    use super::*;
    use crate::Pipeline;

    fn lower(source: &str) -> String {
        let tree = Pipeline::new()
            .with_stage(ArrowFunctions)
            .run(
                &SourceBuffer::new("arrow.js", source.as_bytes().to_vec()),
                &EsfpSyntax::default(),
            )
            .unwrap();
        esfp_codegen::generate(&tree, false).unwrap().code
    }

    #[test]
    fn expression_body_gets_return() {
        assert_eq!(
            lower("const sq = (x) => x * x;").trim(),
            "const sq = function(x) {\n    return x * x;\n};"
        );
    }

    #[test]
    fn block_body_is_reused() {
        assert_eq!(
            lower("run(async () => { await tick(); });").trim(),
            "run(async function() {\n    await tick();\n});"
        );
    }

    #[test]
    fn this_keeps_arrow() {
        let out = lower("const get = () => this.value;");
        assert!(out.contains("=>"), "{out}");
    }

    #[test]
    fn nested_this_keeps_outer_arrow() {
        let out = lower("const f = () => () => this;");
        assert!(!out.contains("function"), "{out}");
    }

    #[test]
    fn this_inside_function_does_not_count() {
        let out = lower("const f = () => function() { return this; };");
        assert!(!out.contains("=>"), "{out}");
    }

    #[test]
    fn arguments_keeps_arrow() {
        let out = lower("function outer() { return () => arguments[0]; }");
        assert!(out.contains("=>"), "{out}");
    }

    #[test]
    fn statement_position_is_parenthesized() {
        let out = lower("(() => 1);");
        assert!(out.trim().starts_with("(function"), "{out}");
    }

    #[test]
    fn leading_sequence_operand_is_parenthesized() {
        let out = lower("a => a, b;");
        assert_eq!(out.trim(), "(function(a) {\n    return a;\n}, b);");
    }

    #[test]
    fn function_later_in_statement_is_not_wrapped() {
        let out = lower("x, a => a;");
        assert!(out.trim().starts_with("x, function(a)"), "{out}");
    }
}
