//! Lowering for the exponentiation operator.
//!
//! `a ** b`   → `Math.pow(a, b)`
//! `a **= b`  → `a = Math.pow(a, b)`
//!
//! The call keeps the span of the original binary expression. `Math.pow` is
//! synthetic. Compound assignments are lowered only when the target can be read
//! again without side effects: an identifier, or a member of an identifier or
//! `this` with a plain key. Other targets such as `o[f()] **= 2` are left as
//! they are.

use esfp_ast::SyntaxTree;
use swc_common::Span;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::stage::{StageError, TransformStage};
use crate::synth::member_call;

#[derive(Debug, Clone, Copy, Default)]
pub struct Exponentiation;

impl TransformStage for Exponentiation {
    fn name(&self) -> &str {
        "exponentiation"
    }

    fn transform(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        let mut rewriter = PowRewriter {
            synthetic: tree.synthetic_span(),
        };
        tree.module.visit_mut_with(&mut rewriter);
        Ok(tree)
    }
}

struct PowRewriter {
    synthetic: Span,
}

impl VisitMut for PowRewriter {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        expr.visit_mut_children_with(self);

        match expr {
            ast::Expr::Bin(bin) if bin.op == ast::BinaryOp::Exp => {
                *expr = member_call(
                    bin.span,
                    self.synthetic,
                    "Math",
                    "pow",
                    vec![bin.left.clone(), bin.right.clone()],
                );
            }
            ast::Expr::Assign(assign) if assign.op == ast::AssignOp::ExpAssign => {
                let Some(current) = reread(&assign.left) else {
                    return;
                };
                assign.op = ast::AssignOp::Assign;
                assign.right = Box::new(member_call(
                    self.synthetic,
                    self.synthetic,
                    "Math",
                    "pow",
                    vec![Box::new(current), assign.right.clone()],
                ));
            }
            _ => {}
        }
    }
}

/// The target of a compound assignment as an expression, if evaluating it a
/// second time has no side effects.
fn reread(target: &ast::AssignTarget) -> Option<ast::Expr> {
    let ast::AssignTarget::Simple(simple) = target else {
        return None;
    };
    match simple {
        ast::SimpleAssignTarget::Ident(binding) => Some(ast::Expr::Ident(binding.id.clone())),
        ast::SimpleAssignTarget::Member(member) => {
            let plain_object = matches!(&*member.obj, ast::Expr::Ident(_) | ast::Expr::This(_));
            let plain_key = match &member.prop {
                ast::MemberProp::Ident(_) | ast::MemberProp::PrivateName(_) => true,
                ast::MemberProp::Computed(key) => {
                    matches!(&*key.expr, ast::Expr::Ident(_) | ast::Expr::Lit(_))
                }
            };
            (plain_object && plain_key).then(|| ast::Expr::Member(member.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use esfp_ast::EsfpSyntax;
    use esfp_source::SourceBuffer;

    use crate::Pipeline;

    fn lower(source: &str) -> String {
        let tree = Pipeline::new()
            .with_stage(super::Exponentiation)
            .run(
                &SourceBuffer::new("pow.js", source.as_bytes().to_vec()),
                &EsfpSyntax::default(),
            )
            .unwrap();
        esfp_codegen::generate(&tree, false).unwrap().code
    }

    #[test]
    fn rewrites_power() {
        assert_eq!(lower("const y = a ** b;").trim(), "const y = Math.pow(a, b);");
    }

    #[test]
    fn nested_power_is_right_associative() {
        assert_eq!(
            lower("x = a ** b ** c;").trim(),
            "x = Math.pow(a, Math.pow(b, c));"
        );
    }

    #[test]
    fn rewrites_compound_assignment() {
        assert_eq!(lower("x **= 2;").trim(), "x = Math.pow(x, 2);");
        assert_eq!(lower("o.p **= n;").trim(), "o.p = Math.pow(o.p, n);");
        assert_eq!(lower("this[k] **= a ** b;").trim(), "this[k] = Math.pow(this[k], Math.pow(a, b));");
    }

    #[test]
    fn compound_assignment_with_effectful_target_is_kept() {
        assert_eq!(lower("o[f()] **= 2;").trim(), "o[f()] **= 2;");
        assert_eq!(lower("x += 2;").trim(), "x += 2;");
    }

    #[test]
    fn other_operators_are_untouched() {
        assert_eq!(lower("x = a * b;").trim(), "x = a * b;");
    }
}
