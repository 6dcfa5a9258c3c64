//! Static evaluation of require arguments
//!
//! Only a narrow set of forms counts as statically known: string literals,
//! parenthesized expressions, `+`-concatenation of two static strings, and
//! template literals without substitutions. Literal non-strings evaluate to
//! a known non-string, which the rewriter rejects. Everything else is
//! unknown and leaves the call untouched. Mixed-type additions rely on
//! coercion rules this evaluator does not model, so they evaluate as
//! unknown.

use swc_core::ecma::ast::{BinaryOp, Expr, Lit, UnaryOp};

/// Outcome of statically evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Static {
    /// The expression is a compile-time string with this value.
    Str(String),
    /// The expression is a compile-time constant that is not a string.
    NonString,
    /// The expression cannot be evaluated here.
    Unknown,
}

/// Evaluate an expression to a compile-time constant where possible.
pub(crate) fn evaluate(expr: &Expr) -> Static {
    match expr {
        Expr::Lit(Lit::Str(s)) => Static::Str(s.value.to_string()),
        Expr::Lit(Lit::Bool(_) | Lit::Null(_) | Lit::Num(_) | Lit::BigInt(_) | Lit::Regex(_)) => {
            Static::NonString
        }
        Expr::Paren(paren) => evaluate(&paren.expr),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() && tpl.quasis.len() == 1 => {
            match tpl.quasis[0].cooked.as_ref() {
                Some(cooked) => Static::Str(cooked.to_string()),
                None => Static::Unknown,
            }
        }
        Expr::Bin(bin) if bin.op == BinaryOp::Add => {
            match (evaluate(&bin.left), evaluate(&bin.right)) {
                (Static::Str(left), Static::Str(right)) => Static::Str(left + right.as_str()),
                (Static::NonString, Static::NonString) => Static::NonString,
                _ => Static::Unknown,
            }
        }
        Expr::Unary(unary) => match unary.op {
            UnaryOp::Void | UnaryOp::Minus | UnaryOp::Plus | UnaryOp::Bang | UnaryOp::Tilde => {
                match evaluate(&unary.arg) {
                    Static::Unknown => Static::Unknown,
                    _ => Static::NonString,
                }
            }
            _ => Static::Unknown,
        },
        _ => Static::Unknown,
    }
}
