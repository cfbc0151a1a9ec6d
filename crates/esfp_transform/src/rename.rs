//! Module-wide identifier rename.
//!
//! Every identifier named `from` becomes `to`, with no scope analysis.
//! Property names are not identifiers and stay as they are. Shorthand
//! properties, shorthand destructuring and import/export specifiers are
//! expanded so the property or export name they stand for is preserved.

use esfp_ast::SyntaxTree;
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use crate::stage::{StageError, TransformStage};

#[derive(Debug, Clone)]
pub struct RenameIdentifier {
    name: String,
    from: String,
    to: String,
}

impl RenameIdentifier {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            name: format!("rename-{from}-to-{to}"),
            from,
            to,
        }
    }
}

impl TransformStage for RenameIdentifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, mut tree: SyntaxTree) -> Result<SyntaxTree, StageError> {
        tree.module.visit_mut_with(&mut Renamer { stage: self });
        Ok(tree)
    }
}

struct Renamer<'a> {
    stage: &'a RenameIdentifier,
}

impl Renamer<'_> {
    fn matches(&self, ident: &ast::Ident) -> bool {
        *ident.sym == *self.stage.from
    }

    fn key(&self, ident: &ast::Ident) -> ast::PropName {
        ast::PropName::Ident(ast::IdentName::new(ident.sym.clone(), ident.span))
    }
}

impl VisitMut for Renamer<'_> {
    fn visit_mut_ident(&mut self, ident: &mut ast::Ident) {
        if self.matches(ident) {
            ident.sym = self.stage.to.as_str().into();
        }
    }

    // `{ a }` → `{ a: b }`
    fn visit_mut_prop(&mut self, prop: &mut ast::Prop) {
        if let ast::Prop::Shorthand(ident) = prop {
            if self.matches(ident) {
                let key = self.key(ident);
                let mut value = ident.clone();
                self.visit_mut_ident(&mut value);
                *prop = ast::Prop::KeyValue(ast::KeyValueProp {
                    key,
                    value: Box::new(ast::Expr::Ident(value)),
                });
                return;
            }
        }
        prop.visit_mut_children_with(self);
    }

    // `const { a = 1 } = o` → `const { a: b = 1 } = o`
    fn visit_mut_object_pat_prop(&mut self, prop: &mut ast::ObjectPatProp) {
        if let ast::ObjectPatProp::Assign(assign) = prop {
            if self.matches(&assign.key.id) {
                let key = self.key(&assign.key.id);
                let mut binding = assign.key.clone();
                binding.visit_mut_with(self);
                let mut value = Box::new(ast::Pat::Ident(binding));
                if let Some(default) = &assign.value {
                    let mut default = default.clone();
                    default.visit_mut_with(self);
                    value = Box::new(ast::Pat::Assign(ast::AssignPat {
                        span: assign.span,
                        left: value,
                        right: default,
                    }));
                }
                *prop = ast::ObjectPatProp::KeyValue(ast::KeyValuePatProp { key, value });
                return;
            }
        }
        prop.visit_mut_children_with(self);
    }

    // `import { a } from "m"` → `import { a as b } from "m"`
    fn visit_mut_import_named_specifier(&mut self, spec: &mut ast::ImportNamedSpecifier) {
        if spec.imported.is_none() && self.matches(&spec.local) {
            spec.imported = Some(ast::ModuleExportName::Ident(spec.local.clone()));
        }
        spec.local.visit_mut_with(self);
    }

    // Re-exports name bindings of another module.
    fn visit_mut_named_export(&mut self, export: &mut ast::NamedExport) {
        if export.src.is_none() {
            export.visit_mut_children_with(self);
        }
    }

    // `export { a }` → `export { b as a }`
    fn visit_mut_export_named_specifier(&mut self, spec: &mut ast::ExportNamedSpecifier) {
        if let ast::ModuleExportName::Ident(orig) = &mut spec.orig {
            if spec.exported.is_none() && self.matches(orig) {
                spec.exported = Some(ast::ModuleExportName::Ident(orig.clone()));
            }
            self.visit_mut_ident(orig);
        }
    }
}
