//! Binding mutation scan
//!
//! A require-bound declarator may only be deleted when its binding behaves
//! like a constant: declared exactly once and never assigned outside that
//! declarator. This pass walks the resolved script once and records every
//! write and every declaration so the rewriter can answer that question with
//! a lookup.

use rustc_hash::{FxHashMap, FxHashSet};
use swc_core::ecma::{
    ast::{
        AssignExpr, AssignTarget, AssignTargetPat, ClassDecl, Expr, FnDecl, ForHead, ForInStmt,
        ForOfStmt, Id, ObjectPatProp, Pat, Script, SimpleAssignTarget, UpdateExpr, VarDeclarator,
    },
    visit::{Visit, VisitWith},
};

/// Write and declaration facts for every binding in one script.
pub(crate) struct MutationReport {
    written: FxHashSet<Id>,
    declared: FxHashMap<Id, u32>,
}

impl MutationReport {
    /// Scan a script that has already been through the resolver, so that
    /// shadowed bindings carry distinct syntax contexts.
    pub(crate) fn collect(script: &Script) -> Self {
        let mut collector = Collector {
            written: FxHashSet::default(),
            declared: FxHashMap::default(),
        };
        script.visit_with(&mut collector);
        Self {
            written: collector.written,
            declared: collector.declared,
        }
    }

    pub(crate) fn is_constant(&self, id: &Id) -> bool {
        !self.written.contains(id) && self.declared.get(id).copied().unwrap_or(0) <= 1
    }
}

struct Collector {
    written: FxHashSet<Id>,
    declared: FxHashMap<Id, u32>,
}

impl Collector {
    fn record_write_target(&mut self, target: &AssignTarget) {
        match target {
            AssignTarget::Simple(simple) => match simple {
                SimpleAssignTarget::Ident(binding) => {
                    self.written.insert(binding.to_id());
                }
                SimpleAssignTarget::Paren(paren) => {
                    if let Expr::Ident(ident) = &*paren.expr {
                        self.written.insert(ident.to_id());
                    }
                }
                // Member and similar targets never write a binding.
                _ => {}
            },
            AssignTarget::Pat(pat) => match pat {
                AssignTargetPat::Array(array) => {
                    for elem in array.elems.iter().flatten() {
                        self.record_write_pat(elem);
                    }
                }
                AssignTargetPat::Object(object) => {
                    for prop in &object.props {
                        self.record_write_pat_prop(prop);
                    }
                }
                AssignTargetPat::Invalid(_) => {}
            },
        }
    }

    fn record_write_pat(&mut self, pat: &Pat) {
        let mut ids = Vec::new();
        pat_idents(pat, &mut ids);
        self.written.extend(ids);
    }

    fn record_write_pat_prop(&mut self, prop: &ObjectPatProp) {
        match prop {
            ObjectPatProp::KeyValue(kv) => self.record_write_pat(&kv.value),
            ObjectPatProp::Assign(assign) => {
                self.written.insert(assign.key.to_id());
            }
            ObjectPatProp::Rest(rest) => self.record_write_pat(&rest.arg),
        }
    }

    fn record_declaration(&mut self, id: Id) {
        *self.declared.entry(id).or_insert(0) += 1;
    }
}

impl Visit for Collector {
    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        self.record_write_target(&node.left);
        node.visit_children_with(self);
    }

    fn visit_update_expr(&mut self, node: &UpdateExpr) {
        if let Expr::Ident(ident) = &*node.arg {
            self.written.insert(ident.to_id());
        }
        node.visit_children_with(self);
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        if let ForHead::Pat(pat) = &node.left {
            self.record_write_pat(pat);
        }
        node.visit_children_with(self);
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        if let ForHead::Pat(pat) = &node.left {
            self.record_write_pat(pat);
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let mut ids = Vec::new();
        pat_idents(&node.name, &mut ids);
        for id in ids {
            self.record_declaration(id);
        }
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.record_declaration(node.ident.to_id());
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.record_declaration(node.ident.to_id());
        node.visit_children_with(self);
    }
}

/// Collect every binding identifier reachable from a pattern.
pub(crate) fn pat_idents(pat: &Pat, out: &mut Vec<Id>) {
    match pat {
        Pat::Ident(binding) => out.push(binding.to_id()),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                pat_idents(elem, out);
            }
        }
        Pat::Rest(rest) => pat_idents(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => pat_idents(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(assign.key.to_id()),
                    ObjectPatProp::Rest(rest) => pat_idents(&rest.arg, out),
                }
            }
        }
        Pat::Assign(assign) => pat_idents(&assign.left, out),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use swc_core::{
        common::{GLOBALS, Globals, Mark},
        ecma::{
            ast::{Id, Ident, Script},
            transforms::base::resolver,
            visit::{Visit, VisitMutWith, VisitWith},
        },
    };

    use super::MutationReport;

    struct IdFinder<'a> {
        name: &'a str,
        found: Option<Id>,
    }

    impl Visit for IdFinder<'_> {
        fn visit_ident(&mut self, ident: &Ident) {
            if self.found.is_none() && ident.sym.as_ref() == self.name {
                self.found = Some(ident.to_id());
            }
        }
    }

    fn resolved_script(source: &str) -> Script {
        let (mut script, _) =
            crate::parse::parse_script(Path::new("/src/test.js"), source).unwrap();
        GLOBALS.set(&Globals::new(), || {
            let unresolved_mark = Mark::new();
            let top_level_mark = Mark::new();
            script.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
        });
        script
    }

    fn first_id(script: &Script, name: &str) -> Id {
        let mut finder = IdFinder { name, found: None };
        script.visit_with(&mut finder);
        finder.found.unwrap()
    }

    #[test]
    fn test_single_declaration_is_constant() {
        let script = resolved_script("var a = require('./x');\na.foo();\n");
        let report = MutationReport::collect(&script);
        assert!(report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_reassignment_breaks_constancy() {
        let script = resolved_script("var a = 1;\na = 2;\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_update_expression_counts_as_write() {
        let script = resolved_script("var a = 1;\na++;\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_redeclaration_breaks_constancy() {
        let script = resolved_script("var a = 1;\nvar a = 2;\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_destructuring_assignment_counts_as_write() {
        let script = resolved_script("var a = 1;\n({ a } = obj);\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_for_of_head_counts_as_write() {
        let script = resolved_script("var a = 1;\nfor (a of xs) {}\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_shadowing_param_leaves_outer_binding_constant() {
        let script = resolved_script("var a = 1;\nfunction f(a) {\n  a = 2;\n}\n");
        let report = MutationReport::collect(&script);
        assert!(report.is_constant(&first_id(&script, "a")));
    }

    #[test]
    fn test_function_redeclaration_breaks_constancy() {
        let script = resolved_script("var a = 1;\nfunction a() {}\n");
        let report = MutationReport::collect(&script);
        assert!(!report.is_constant(&first_id(&script, "a")));
    }
}
