//! Lowering for untagged template literals.
//!
//! `` `a${b}c` `` → `"a" + b + "c"`
//!
//! The result always starts with a string literal so `+` concatenates even when
//! the first interpolation is a number. Empty literal parts after the first are
//! dropped. Tagged templates are left alone.

use anyhow::anyhow;
use esfp_ast::SyntaxTree;
use swc_common::Span;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::stage::{StageError, TransformStage};
use crate::synth::{add, operand};

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLiterals;

impl TransformStage for TemplateLiterals {
    fn name(&self) -> &str {
        "template-literals"
    }

    fn transform(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        let mut rewriter = TemplateRewriter {
            synthetic: tree.synthetic_span(),
            invalid: None,
        };
        tree.module.visit_mut_with(&mut rewriter);

        if let Some(span) = rewriter.invalid {
            return Err(StageError::new(
                self.name(),
                anyhow!("template literal contains an invalid escape sequence"),
            )
            .with_position(tree.position(span.lo)));
        }
        Ok(tree)
    }
}

struct TemplateRewriter {
    synthetic: Span,
    /// First literal part without a cooked value.
    invalid: Option<Span>,
}

impl VisitMut for TemplateRewriter {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        expr.visit_mut_children_with(self);
        if self.invalid.is_some() {
            return;
        }

        let ast::Expr::Tpl(tpl) = expr else {
            return;
        };
        match concat(tpl, self.synthetic) {
            Ok(lowered) => *expr = lowered,
            Err(span) => self.invalid = Some(span),
        }
    }
}

fn concat(tpl: &ast::Tpl, synthetic: Span) -> Result<ast::Expr, Span> {
    let mut quasis = tpl.quasis.iter();
    let Some(first) = quasis.next() else {
        return Ok(ast::Expr::Lit(ast::Lit::Str(ast::Str {
            span: tpl.span,
            value: "".into(),
            raw: None,
        })));
    };

    let mut acc = string(first)?;
    for (expr, quasi) in tpl.exprs.iter().zip(quasis) {
        acc = add(synthetic, acc, operand(synthetic, expr));
        if !quasi.raw.is_empty() {
            acc = add(synthetic, acc, string(quasi)?);
        }
    }
    Ok(acc)
}

fn string(quasi: &ast::TplElement) -> Result<ast::Expr, Span> {
    let value = quasi.cooked.clone().ok_or(quasi.span)?;
    Ok(ast::Expr::Lit(ast::Lit::Str(ast::Str {
        span: quasi.span,
        value,
        raw: None,
    })))
}
