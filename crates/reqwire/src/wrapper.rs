//! Module wrapping and export exposure
//!
//! Every compiled file defines exactly one global: the body is wrapped in
//! `var <id> = __reqwire_initialize_module__(function(module, exports) {...})`
//! where `<id>` is the file's derived identifier. Files may opt into
//! publishing their exports under a legacy global namespace with an
//! `expose <dotted.path>` directive, which is consumed here.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use swc_core::ecma::ast::{Expr, Lit, Script, Stmt};

use crate::{
    ast_builder,
    context::TransformContext,
    error::{Error, Result},
    naming,
    types::FileMetadata,
};

/// Matches an expose directive. The dotted path is plain identifier
/// segments; anything else is not a directive and stays in the output as
/// inert data.
static EXPOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^expose ([A-Za-z]+(?:\.[A-Za-z]+)*)$").expect("expose pattern is valid")
});

/// Wrap the whole script body in the module initializer call.
///
/// Runs before any require rewriting. The directive prologue (including
/// `'use strict'`) moves into the wrapped function; an expose directive is
/// removed and turned into a trailing assignment inside the function body,
/// where `exports` is in scope.
pub(crate) fn wrap_script(
    ctx: &TransformContext,
    script: &mut Script,
    metadata: &mut FileMetadata,
) -> Result<()> {
    let own_identifier = naming::module_identifier(&ctx.source_root, &ctx.filename);
    let expose = extract_expose(&mut script.body)?;

    let mut inner = std::mem::take(&mut script.body);
    if let Some(segments) = expose {
        debug!(
            "Exposing {} as {}",
            ctx.filename.display(),
            segments.join(".")
        );
        inner.push(expose_stmt(&segments));
    }

    let init_call = ast_builder::call_expr(
        ast_builder::ident_expr(naming::INIT_HELPER),
        vec![ast_builder::function_expr(&["module", "exports"], inner)],
    );
    script.body = vec![ast_builder::var_stmt(&own_identifier, init_call)];
    metadata.rewired = true;
    Ok(())
}

/// Scan the directive prologue for an expose directive and remove it.
///
/// Only the leading run of string expression statements is considered. Two
/// or more expose directives in the same file is a configuration error, not
/// a last-one-wins situation.
fn extract_expose(body: &mut Vec<Stmt>) -> Result<Option<Vec<String>>> {
    let mut found: Option<(usize, String)> = None;
    for (index, stmt) in body.iter().enumerate() {
        let Stmt::Expr(expr_stmt) = stmt else { break };
        let Expr::Lit(Lit::Str(value)) = &*expr_stmt.expr else {
            break;
        };
        if let Some(captures) = EXPOSE_RE.captures(&value.value) {
            let target = captures[1].to_string();
            if let Some((_, first)) = &found {
                return Err(Error::DuplicateExpose {
                    first: first.clone(),
                    second: target,
                });
            }
            found = Some((index, target));
        }
    }

    match found {
        Some((index, target)) => {
            body.remove(index);
            Ok(Some(target.split('.').map(str::to_string).collect()))
        }
        None => Ok(None),
    }
}

/// Build `<dotted.path> = exports["default"] != null ? exports["default"] : exports;`
fn expose_stmt(segments: &[String]) -> Stmt {
    let default_export = ast_builder::computed_member(ast_builder::ident_expr("exports"), "default");
    let value = ast_builder::cond_expr(
        ast_builder::not_eq(default_export.clone(), ast_builder::null_lit()),
        default_export,
        ast_builder::ident_expr("exports"),
    );
    ast_builder::assign_stmt(ast_builder::assign_target(segments), value)
}
