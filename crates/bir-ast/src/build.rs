// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terse constructors for hand-built trees.
//!
//! Resolution and inference run upstream, so tests and tools that want to
//! feed the lowering pass directly assemble annotated trees here. All nodes
//! get an empty span.

use crate::decl::{
    Constant, Function, FunctionBody, GlobalVariable, ImportPackage, Package, Param,
    TypeDefinition,
};
use crate::expr::{BinOp, Expr, ExprKind, Literal, TypeDesc, UnaryOp};
use crate::stmt::{Block, Stmt, StmtKind, VarDef};
use crate::{Ident, PackageId, SemType, Span, SymbolRef};

pub fn ident(name: &str) -> Ident {
    Ident::new(name, Span::default())
}

fn expr(kind: ExprKind, ty: Option<SemType>) -> Expr {
    Expr {
        kind,
        ty,
        span: Span::default(),
    }
}

fn stmt(kind: StmtKind) -> Stmt {
    Stmt {
        kind,
        span: Span::default(),
    }
}

// Expressions

pub fn literal(lit: Literal) -> Expr {
    let ty = match &lit {
        Literal::Nil => SemType::Nil,
        Literal::Boolean(_) => SemType::Boolean,
        Literal::Int(_) => SemType::Int,
        Literal::Float(_) => SemType::Float,
        Literal::Decimal(_) => SemType::Decimal,
        Literal::String(_) => SemType::String,
    };
    expr(ExprKind::Literal(lit), Some(ty))
}

pub fn int(value: i64) -> Expr {
    literal(Literal::Int(value))
}

pub fn boolean(value: bool) -> Expr {
    literal(Literal::Boolean(value))
}

pub fn string(value: &str) -> Expr {
    literal(Literal::String(value.to_string()))
}

pub fn nil() -> Expr {
    literal(Literal::Nil)
}

pub fn var(name: &str, symbol: SymbolRef, ty: SemType) -> Expr {
    expr(
        ExprKind::VarRef {
            name: ident(name),
            symbol,
        },
        Some(ty),
    )
}

pub fn binary(op: BinOp, lhs: Expr, rhs: Expr, ty: SemType) -> Expr {
    expr(
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        Some(ty),
    )
}

pub fn unary(op: UnaryOp, operand: Expr, ty: SemType) -> Expr {
    expr(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        Some(ty),
    )
}

pub fn call(name: &str, args: Vec<Expr>, ty: SemType) -> Expr {
    expr(
        ExprKind::Invocation {
            pkg_alias: None,
            name: ident(name),
            args,
        },
        Some(ty),
    )
}

/// `alias:name(args)`
pub fn qualified_call(alias: &str, name: &str, args: Vec<Expr>, ty: SemType) -> Expr {
    expr(
        ExprKind::Invocation {
            pkg_alias: Some(ident(alias)),
            name: ident(name),
            args,
        },
        Some(ty),
    )
}

pub fn index(container: Expr, idx: Expr, ty: SemType) -> Expr {
    expr(
        ExprKind::IndexAccess {
            container: Box::new(container),
            index: Box::new(idx),
        },
        Some(ty),
    )
}

pub fn list(elements: Vec<Expr>, element_type: SemType) -> Expr {
    expr(
        ExprKind::ListConstructor {
            elements,
            element_type: Some(element_type),
        },
        Some(SemType::List),
    )
}

pub fn cast(value: Expr, target: SemType) -> Expr {
    expr(
        ExprKind::TypeConversion {
            expr: Box::new(value),
            target: TypeDesc {
                ty: Some(target.clone()),
                span: Span::default(),
            },
        },
        Some(target),
    )
}

pub fn type_test(value: Expr, target: SemType, negated: bool) -> Expr {
    expr(
        ExprKind::TypeTest {
            expr: Box::new(value),
            target: TypeDesc {
                ty: Some(target),
                span: Span::default(),
            },
            negated,
        },
        Some(SemType::Boolean),
    )
}

pub fn group(inner: Expr) -> Expr {
    let ty = inner.ty.clone();
    expr(ExprKind::Group(Box::new(inner)), ty)
}

pub fn wildcard() -> Expr {
    expr(ExprKind::WildcardBindingPattern, None)
}

pub fn field(value: Expr, name: &str, ty: SemType) -> Expr {
    expr(
        ExprKind::FieldAccess {
            expr: Box::new(value),
            field: ident(name),
        },
        Some(ty),
    )
}

// Statements

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: Span::default(),
    }
}

pub fn block_stmt(stmts: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Block(block(stmts)))
}

pub fn expr_stmt(value: Expr) -> Stmt {
    stmt(StmtKind::Expr(value))
}

pub fn if_then(cond: Expr, then_body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        cond,
        then_body: block(then_body),
        else_stmt: None,
    })
}

pub fn if_else(cond: Expr, then_body: Vec<Stmt>, else_body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::If {
        cond,
        then_body: block(then_body),
        else_stmt: Some(Box::new(block_stmt(else_body))),
    })
}

/// `if .. else if ..`: the else branch is itself a statement.
pub fn if_else_stmt(cond: Expr, then_body: Vec<Stmt>, else_stmt: Stmt) -> Stmt {
    stmt(StmtKind::If {
        cond,
        then_body: block(then_body),
        else_stmt: Some(Box::new(else_stmt)),
    })
}

pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::While {
        cond,
        body: block(body),
    })
}

pub fn ret(value: Option<Expr>) -> Stmt {
    stmt(StmtKind::Return(value))
}

pub fn break_stmt() -> Stmt {
    stmt(StmtKind::Break)
}

pub fn continue_stmt() -> Stmt {
    stmt(StmtKind::Continue)
}

pub fn var_def(name: &str, symbol: SymbolRef, ty: SemType, init: Option<Expr>) -> Stmt {
    stmt(StmtKind::VarDef(VarDef {
        name: ident(name),
        symbol,
        ty: Some(ty),
        init,
    }))
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    stmt(StmtKind::Assign { target, value })
}

pub fn compound_assign(op: BinOp, target: Expr, value: Expr, ty: SemType) -> Stmt {
    stmt(StmtKind::CompoundAssign {
        op,
        target,
        value,
        ty: Some(ty),
    })
}

pub fn panic(error: Expr) -> Stmt {
    stmt(StmtKind::Panic(error))
}

pub fn lock(body: Vec<Stmt>) -> Stmt {
    stmt(StmtKind::Lock(block(body)))
}

// Declarations

pub fn param(name: &str, symbol: SymbolRef, ty: SemType) -> Param {
    Param {
        name: ident(name),
        symbol,
        ty: Some(ty),
        span: Span::default(),
    }
}

pub fn function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<SemType>,
    body: Vec<Stmt>,
) -> Function {
    Function {
        name: ident(name),
        params,
        return_type,
        body: FunctionBody::Block(block(body)),
        span: Span::default(),
    }
}

/// `function name(params) returns T => body;`
pub fn expr_function(name: &str, params: Vec<Param>, return_type: SemType, body: Expr) -> Function {
    Function {
        name: ident(name),
        params,
        return_type: Some(return_type),
        body: FunctionBody::Expr(body),
        span: Span::default(),
    }
}

pub fn import(org: Option<&str>, comps: &[&str], alias: Option<&str>) -> ImportPackage {
    ImportPackage {
        org_name: org.map(ident),
        pkg_name_comps: comps.iter().map(|c| ident(c)).collect(),
        version: None,
        alias: alias.map(ident),
        span: Span::default(),
    }
}

pub fn constant(name: &str, symbol: SymbolRef, value: Expr) -> Constant {
    Constant {
        name: ident(name),
        symbol,
        ty: value.ty.clone(),
        value,
        span: Span::default(),
    }
}

pub fn global(name: &str, symbol: SymbolRef, ty: SemType) -> GlobalVariable {
    GlobalVariable {
        name: ident(name),
        symbol,
        ty: Some(ty),
        span: Span::default(),
    }
}

pub fn type_definition(name: &str, ty: Option<SemType>) -> TypeDefinition {
    TypeDefinition {
        name: ident(name),
        ty,
        span: Span::default(),
    }
}

/// A package holding only `functions`.
pub fn package(package_id: PackageId, functions: Vec<Function>) -> Package {
    Package {
        package_id,
        imports: Vec::new(),
        type_definitions: Vec::new(),
        global_vars: Vec::new(),
        constants: Vec::new(),
        functions,
    }
}
