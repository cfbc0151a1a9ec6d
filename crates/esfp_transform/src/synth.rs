//! Builders for nodes that stages synthesize.

use swc_common::Span;
use swc_ecma_ast as ast;

/// Build `object.property(args...)`.
///
/// `span` becomes the span of the call itself, `callee_span` the span of the
/// member expression and both of its identifiers.
pub(crate) fn member_call(
    span: Span,
    callee_span: Span,
    object: &str,
    property: &str,
    args: Vec<Box<ast::Expr>>,
) -> ast::Expr {
    let callee = ast::Expr::Member(ast::MemberExpr {
        span: callee_span,
        obj: Box::new(ast::Expr::Ident(ast::Ident::new_no_ctxt(
            object.into(),
            callee_span,
        ))),
        prop: ast::MemberProp::Ident(ast::IdentName::new(property.into(), callee_span)),
    });

    ast::Expr::Call(ast::CallExpr {
        span,
        callee: ast::Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ast::ExprOrSpread { spread: None, expr })
            .collect(),
        type_args: None,
        ..Default::default()
    })
}

/// Build `left + right`.
pub(crate) fn add(span: Span, left: ast::Expr, right: ast::Expr) -> ast::Expr {
    ast::Expr::Bin(ast::BinExpr {
        span,
        op: ast::BinaryOp::Add,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Wrap `expr` in parentheses unless it already binds tighter than any binary
/// operator.
pub(crate) fn operand(span: Span, expr: &ast::Expr) -> ast::Expr {
    match expr {
        ast::Expr::Ident(_)
        | ast::Expr::Lit(_)
        | ast::Expr::Member(_)
        | ast::Expr::Call(_)
        | ast::Expr::Paren(_)
        | ast::Expr::This(_)
        | ast::Expr::Array(_)
        | ast::Expr::Object(_) => expr.clone(),
        _ => ast::Expr::Paren(ast::ParenExpr {
            span,
            expr: Box::new(expr.clone()),
        }),
    }
}
