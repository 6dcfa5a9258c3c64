//! AST builder module for creating synthetic nodes
//!
//! Factory functions for the JavaScript nodes the wrapper and the rewriting
//! visitors emit. All synthetic nodes carry dummy spans and empty syntax
//! contexts; hygiene marks are assigned by the resolver pass that runs after
//! wrapping.

use swc_core::{
    common::{DUMMY_SP, SyntaxContext},
    ecma::ast::{
        AssignExpr, AssignOp, AssignTarget, BinExpr, BinaryOp, BindingIdent, BlockStmt, CallExpr,
        Callee, ComputedPropName, CondExpr, Decl, EmptyStmt, Expr, ExprOrSpread, ExprStmt, FnExpr,
        Function, Ident, IdentName, Lit, MemberExpr, MemberProp, Null, Param, Pat,
        SimpleAssignTarget, Stmt, Str, VarDecl, VarDeclKind, VarDeclarator,
    },
};

use crate::types::Resolved;

/// Create an identifier with an empty syntax context.
pub(crate) fn ident(name: &str) -> Ident {
    Ident::new(name.into(), DUMMY_SP, SyntaxContext::empty())
}

/// Create an identifier expression: `name`
pub(crate) fn ident_expr(name: &str) -> Expr {
    Expr::Ident(ident(name))
}

/// Create a binding pattern identifier for declarations and parameters.
pub(crate) fn binding_ident(name: &str) -> BindingIdent {
    BindingIdent {
        id: ident(name),
        type_ann: None,
    }
}

/// Create a string literal expression: `"value"`
pub(crate) fn str_lit(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

/// Create the `null` literal.
pub(crate) fn null_lit() -> Expr {
    Expr::Lit(Lit::Null(Null { span: DUMMY_SP }))
}

/// Create a non-computed member access: `obj.prop`
pub(crate) fn member(obj: Expr, prop: &str) -> MemberExpr {
    MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
    }
}

/// Create a computed member access with a string key: `obj["key"]`
pub(crate) fn computed_member(obj: Expr, key: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(str_lit(key)),
        }),
    })
}

/// Create a member chain from dotted-path segments: `a.b.c`
pub(crate) fn member_path(segments: &[String]) -> Expr {
    let (root, rest) = segments
        .split_first()
        .expect("member path needs at least one segment");
    let mut expr = ident_expr(root);
    for segment in rest {
        expr = Expr::Member(member(expr, segment));
    }
    expr
}

/// Create the expression form of a resolved reference.
pub(crate) fn reference_expr(resolved: &Resolved) -> Expr {
    match resolved {
        Resolved::Identifier(name) => ident_expr(name),
        Resolved::Member(segments) => member_path(segments),
    }
}

/// Create an assignment target from dotted-path segments: `a.b.c = ...`
pub(crate) fn assign_target(segments: &[String]) -> AssignTarget {
    let (last, init) = segments
        .split_last()
        .expect("assignment path needs at least one segment");
    if init.is_empty() {
        AssignTarget::Simple(SimpleAssignTarget::Ident(binding_ident(last)))
    } else {
        AssignTarget::Simple(SimpleAssignTarget::Member(member(member_path(init), last)))
    }
}

/// Create an assignment statement: `target = value;`
pub(crate) fn assign_stmt(target: AssignTarget, value: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(Expr::Assign(AssignExpr {
            span: DUMMY_SP,
            op: AssignOp::Assign,
            left: target,
            right: Box::new(value),
        })),
    })
}

/// Create a loose inequality check: `left != right`
pub(crate) fn not_eq(left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::NotEq,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Create a conditional expression: `test ? cons : alt`
pub(crate) fn cond_expr(test: Expr, cons: Expr, alt: Expr) -> Expr {
    Expr::Cond(CondExpr {
        span: DUMMY_SP,
        test: Box::new(test),
        cons: Box::new(cons),
        alt: Box::new(alt),
    })
}

/// Create a call expression: `callee(args...)`
pub(crate) fn call_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        callee: Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
    })
}

/// Create an anonymous function expression: `function(params...) { stmts }`
pub(crate) fn function_expr(params: &[&str], stmts: Vec<Stmt>) -> Expr {
    Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(Function {
            params: params
                .iter()
                .map(|name| Param {
                    span: DUMMY_SP,
                    decorators: vec![],
                    pat: Pat::Ident(binding_ident(name)),
                })
                .collect(),
            decorators: vec![],
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            body: Some(BlockStmt {
                span: DUMMY_SP,
                ctxt: SyntaxContext::empty(),
                stmts,
            }),
            is_generator: false,
            is_async: false,
            type_params: None,
            return_type: None,
        }),
    })
}

/// Create a single-declarator declaration: `var name = init;`
pub(crate) fn var_stmt(name: &str, init: Expr) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: SyntaxContext::empty(),
        kind: VarDeclKind::Var,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(binding_ident(name)),
            init: Some(Box::new(init)),
            definite: false,
        }],
    })))
}

/// Marker statement standing in for a removed one. Statement lists filter
/// these out after traversal; the dummy span keeps user-written empty
/// statements distinguishable.
pub(crate) fn removed_stmt() -> Stmt {
    Stmt::Empty(EmptyStmt { span: DUMMY_SP })
}

/// Check whether a statement is a removal marker.
pub(crate) fn is_removed_stmt(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Empty(empty) if empty.span.is_dummy())
}
