//! Require call-site rewriting
//!
//! Walks the script and rewrites every `require(...)` call whose argument is
//! statically known. How a call is rewritten depends on where it sits: a
//! constant `var x = require(...)` declarator is dropped and the binding
//! scheduled for renaming, a bare require statement is removed outright, and
//! any other call site is replaced inline with the resolved reference.

use log::debug;
use rustc_hash::FxHashMap;
use swc_core::ecma::{
    ast::{CallExpr, Callee, Decl, Expr, ForStmt, Id, Stmt, VarDecl, VarDeclOrExpr, VarDeclarator},
    visit::{VisitMut, VisitMutWith},
};

use crate::{
    ast_builder,
    context::TransformContext,
    error::{Error, Result},
    resolver,
    static_eval::{self, Static},
    types::{FileMetadata, Resolved},
    visitors::MutationReport,
};

pub(crate) struct CallRewriter<'a> {
    ctx: &'a TransformContext,
    metadata: &'a mut FileMetadata,
    mutations: &'a MutationReport,
    renames: FxHashMap<Id, Resolved>,
    error: Option<Error>,
}

impl<'a> CallRewriter<'a> {
    pub(crate) fn new(
        ctx: &'a TransformContext,
        metadata: &'a mut FileMetadata,
        mutations: &'a MutationReport,
    ) -> Self {
        Self {
            ctx,
            metadata,
            mutations,
            renames: FxHashMap::default(),
            error: None,
        }
    }

    /// The renames recorded during the walk, or the first error hit.
    pub(crate) fn finish(self) -> Result<FxHashMap<Id, Resolved>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.renames),
        }
    }

    /// The statically known require target, if this call is one we rewrite.
    ///
    /// Calls with a dynamic argument are left for the runtime to handle.
    /// Calls whose argument is statically known to not be a string are
    /// rejected, since they could never succeed at runtime either.
    fn require_target(&mut self, call: &CallExpr) -> Option<String> {
        if !is_require_call(call) || call.args.len() != 1 {
            return None;
        }
        let arg = &call.args[0];
        if arg.spread.is_some() {
            return None;
        }
        match static_eval::evaluate(&arg.expr) {
            Static::Str(target) => Some(target),
            Static::NonString => {
                self.error = Some(Error::InvalidRequireArgument {
                    from: self.ctx.filename.clone(),
                });
                None
            }
            Static::Unknown => None,
        }
    }

    fn resolve(&mut self, target: &str) -> Option<Resolved> {
        match resolver::resolve_target(self.ctx, self.metadata, target) {
            Ok(resolved) => Some(resolved),
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }

    /// Try to consume a `var x = require(...)` declarator as a rename.
    /// Returns true when the declarator was consumed and must be dropped.
    fn try_bind_declarator(&mut self, declarator: &VarDeclarator) -> bool {
        if self.error.is_some() {
            return false;
        }
        let Some(binding) = declarator.name.as_ident() else {
            return false;
        };
        let Some(init) = &declarator.init else {
            return false;
        };
        let Expr::Call(call) = &**init else {
            return false;
        };
        let Some(target) = self.require_target(call) else {
            return false;
        };
        if !self.mutations.is_constant(&binding.to_id()) {
            debug!(
                "Binding {} is written elsewhere, leaving require('{target}') inline",
                binding.sym
            );
            return false;
        }
        let Some(resolved) = self.resolve(&target) else {
            return false;
        };
        debug!("Dropping binding {} in favour of {resolved}", binding.sym);
        self.renames.insert(binding.to_id(), resolved);
        true
    }
}

impl VisitMut for CallRewriter<'_> {
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        if self.error.is_some() {
            return;
        }
        // A bare `require('./x');` imports for side effects only. Record the
        // dependency and drop the whole statement.
        if let Stmt::Expr(expr_stmt) = stmt {
            if let Expr::Call(call) = &*expr_stmt.expr {
                if let Some(target) = self.require_target(call) {
                    if self.resolve(&target).is_some() {
                        debug!("Removing bare require('{target}')");
                        *stmt = ast_builder::removed_stmt();
                    }
                    return;
                }
            }
        }
        stmt.visit_mut_children_with(self);

        // A declaration whose declarators were all consumed vanishes.
        if let Stmt::Decl(Decl::Var(var)) = stmt {
            if var.decls.is_empty() {
                *stmt = ast_builder::removed_stmt();
            }
        }
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<Stmt>) {
        if self.error.is_some() {
            return;
        }
        stmts.visit_mut_children_with(self);
        stmts.retain(|stmt| !ast_builder::is_removed_stmt(stmt));
    }

    fn visit_mut_var_decl(&mut self, var: &mut VarDecl) {
        if self.error.is_some() {
            return;
        }
        var.decls
            .retain(|declarator| !self.try_bind_declarator(declarator));
        var.visit_mut_children_with(self);
    }

    fn visit_mut_for_stmt(&mut self, node: &mut ForStmt) {
        if self.error.is_some() {
            return;
        }
        node.visit_mut_children_with(self);
        if let Some(VarDeclOrExpr::VarDecl(var)) = &node.init {
            if var.decls.is_empty() {
                node.init = None;
            }
        }
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        expr.visit_mut_children_with(self);
        if self.error.is_some() {
            return;
        }
        // Any require call still standing at this point is used as a value.
        if let Expr::Call(call) = expr {
            if let Some(target) = self.require_target(call) {
                if let Some(resolved) = self.resolve(&target) {
                    debug!("Replacing require('{target}') with {resolved}");
                    *expr = ast_builder::reference_expr(&resolved);
                }
            }
        }
    }
}

fn is_require_call(call: &CallExpr) -> bool {
    match &call.callee {
        Callee::Expr(callee) => {
            matches!(&**callee, Expr::Ident(ident) if ident.sym.as_ref() == "require")
        }
        _ => false,
    }
}
