//! Reference renaming for dropped require bindings
//!
//! Once a `var x = require(...)` declarator has been consumed, every
//! remaining reference to `x` is substituted with the resolved reference.
//! Runs as a separate pass because references may appear before the
//! declarator that introduced the binding.
//!
//! [`uniquify_collisions`] runs first and moves any unrelated binding that
//! already uses a target name out of the way, so a substituted reference
//! cannot end up captured by it.

use indexmap::IndexSet;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use swc_core::ecma::{
    ast::{
        ArrowExpr, AssignPat, BindingIdent, CatchClause, ClassDecl, Expr, FnDecl, Function, Id,
        Ident, IdentName, KeyValuePatProp, KeyValueProp, ObjectPat, ObjectPatProp, Pat, Prop,
        PropName, Script, VarDeclarator,
    },
    visit::{Visit, VisitMut, VisitMutWith, VisitWith},
};

use super::mutation::pat_idents;
use crate::{ast_builder, types::Resolved};

pub(crate) struct Renamer {
    renames: FxHashMap<Id, Resolved>,
}

impl Renamer {
    pub(crate) fn new(renames: FxHashMap<Id, Resolved>) -> Self {
        Self { renames }
    }
}

impl VisitMut for Renamer {
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        expr.visit_mut_children_with(self);
        if let Expr::Ident(ident) = expr {
            if let Some(resolved) = self.renames.get(&ident.to_id()) {
                *expr = ast_builder::reference_expr(resolved);
            }
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        // `{ x }` must become `{ x: <reference> }` when x is renamed, since
        // shorthand syntax cannot carry a member expression.
        if let Prop::Shorthand(ident) = prop {
            if let Some(resolved) = self.renames.get(&ident.to_id()) {
                *prop = Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(IdentName::new(ident.sym.clone(), ident.span)),
                    value: Box::new(ast_builder::reference_expr(resolved)),
                });
                return;
            }
        }
        prop.visit_mut_children_with(self);
    }

    // The hooks below reach binding positions, which only carry uniquified
    // entries. Those are always plain identifiers, never member paths.

    fn visit_mut_binding_ident(&mut self, binding: &mut BindingIdent) {
        if let Some(Resolved::Identifier(name)) = self.renames.get(&binding.to_id()) {
            binding.id = ast_builder::ident(name);
        }
    }

    fn visit_mut_object_pat(&mut self, pat: &mut ObjectPat) {
        // `{ x }` and `{ x = d }` destructure the property named x, so the
        // shorthand has to expand into `{ x: <fresh> }` to keep reading it.
        for prop in &mut pat.props {
            if let ObjectPatProp::Assign(assign) = prop {
                if let Some(Resolved::Identifier(name)) = self.renames.get(&assign.key.to_id()) {
                    let key = PropName::Ident(IdentName::new(assign.key.sym.clone(), assign.key.span));
                    let renamed = Pat::Ident(ast_builder::binding_ident(name));
                    let value = match assign.value.take() {
                        Some(default) => Pat::Assign(AssignPat {
                            span: assign.span,
                            left: Box::new(renamed),
                            right: default,
                        }),
                        None => renamed,
                    };
                    *prop = ObjectPatProp::KeyValue(KeyValuePatProp {
                        key,
                        value: Box::new(value),
                    });
                }
            }
        }
        pat.visit_mut_children_with(self);
    }

    fn visit_mut_fn_decl(&mut self, decl: &mut FnDecl) {
        if let Some(Resolved::Identifier(name)) = self.renames.get(&decl.ident.to_id()) {
            decl.ident = ast_builder::ident(name);
        }
        decl.visit_mut_children_with(self);
    }

    fn visit_mut_class_decl(&mut self, decl: &mut ClassDecl) {
        if let Some(Resolved::Identifier(name)) = self.renames.get(&decl.ident.to_id()) {
            decl.ident = ast_builder::ident(name);
        }
        decl.visit_mut_children_with(self);
    }
}

/// Renames file-local bindings whose name collides with a rename target.
///
/// A substituted reference is emitted without regard to scope, so a binding
/// that already uses the target name (a user variable named `$` while a
/// global override resolves to `$`) would capture it. Every such binding is
/// moved to a fresh suffixed name before the [`Renamer`] runs.
///
/// `own_identifier` is the file's wrapper binding. A self-require resolves
/// to exactly that name and must keep referring to it, so the wrapper
/// declaration is never moved.
pub(crate) fn uniquify_collisions(
    script: &Script,
    own_identifier: &str,
    renames: &mut FxHashMap<Id, Resolved>,
) {
    let targets: FxHashSet<String> = renames
        .values()
        .filter_map(|resolved| match resolved {
            Resolved::Identifier(name) => Some(name.clone()),
            Resolved::Member(_) => None,
        })
        .collect();
    if targets.is_empty() {
        return;
    }

    let mut scan = BindingScan::default();
    script.visit_with(&mut scan);

    // Fresh names must avoid everything already in the file as well as
    // everything the rename pass is about to introduce.
    let mut taken = scan.seen;
    for resolved in renames.values() {
        match resolved {
            Resolved::Identifier(name) => {
                taken.insert(name.clone());
            }
            Resolved::Member(segments) => taken.extend(segments.iter().cloned()),
        }
    }

    for id in scan.bindings {
        if id.0.as_ref() == own_identifier {
            continue;
        }
        if targets.contains(id.0.as_ref()) {
            let fresh = fresh_name(id.0.as_ref(), &mut taken);
            debug!("Renaming colliding binding {} to {fresh}", id.0);
            renames.insert(id, Resolved::Identifier(fresh));
        }
    }
}

fn fresh_name(base: &str, taken: &mut FxHashSet<String>) -> String {
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}_{counter}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Collects every binding introduced anywhere in the script, in traversal
/// order, plus the set of identifier names in use.
#[derive(Default)]
struct BindingScan {
    bindings: IndexSet<Id>,
    seen: FxHashSet<String>,
}

impl Visit for BindingScan {
    fn visit_ident(&mut self, ident: &Ident) {
        self.seen.insert(ident.sym.to_string());
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let mut ids = Vec::new();
        pat_idents(&node.name, &mut ids);
        self.bindings.extend(ids);
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.bindings.insert(node.ident.to_id());
        node.visit_children_with(self);
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.bindings.insert(node.ident.to_id());
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        let mut ids = Vec::new();
        for param in &node.params {
            pat_idents(&param.pat, &mut ids);
        }
        self.bindings.extend(ids);
        node.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let mut ids = Vec::new();
        for param in &node.params {
            pat_idents(param, &mut ids);
        }
        self.bindings.extend(ids);
        node.visit_children_with(self);
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        if let Some(param) = &node.param {
            let mut ids = Vec::new();
            pat_idents(param, &mut ids);
            self.bindings.extend(ids);
        }
        node.visit_children_with(self);
    }
}
