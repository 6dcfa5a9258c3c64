//! AST visitor implementations for reqwire
//!
//! The rewrite runs as three passes over the wrapped script: a read-only
//! mutation scan, the rewriting traversal itself, and a rename sweep that
//! substitutes resolved references for removed bindings everywhere they are
//! used, including before their declaration.

mod call_rewriter;
mod mutation;
mod rename;

pub(crate) use call_rewriter::CallRewriter;
pub(crate) use mutation::MutationReport;
pub(crate) use rename::{Renamer, uniquify_collisions};
