// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.

use crate::{Ident, SemType, Span, SymbolRef};

/// An expression together with the type inference determined for it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    /// `None` only where inference is still stubbed out.
    pub ty: Option<SemType>,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a local, parameter, or package constant.
    VarRef { name: Ident, symbol: SymbolRef },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Function call, optionally qualified by an import alias (`io:println(x)`).
    Invocation {
        pkg_alias: Option<Ident>,
        name: Ident,
        args: Vec<Expr>,
    },
    /// `container[index]`
    IndexAccess {
        container: Box<Expr>,
        index: Box<Expr>,
    },
    /// `[a, b, c]`
    ListConstructor {
        elements: Vec<Expr>,
        element_type: Option<SemType>,
    },
    /// `<T> expr`
    TypeConversion { expr: Box<Expr>, target: TypeDesc },
    /// `expr is T` / `expr !is T`
    TypeTest {
        expr: Box<Expr>,
        target: TypeDesc,
        negated: bool,
    },
    /// `(expr)`
    Group(Box<Expr>),
    /// `_` on the left of an assignment.
    WildcardBindingPattern,
    /// `expr.field`
    FieldAccess { expr: Box<Expr>, field: Ident },
    /// `{ k: v, ... }`
    MappingConstructor { fields: Vec<(Ident, Expr)> },
    /// `cond ? a : b`
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
}

impl ExprKind {
    /// Short construct name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "literal",
            ExprKind::VarRef { .. } => "variable reference",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::Invocation { .. } => "invocation",
            ExprKind::IndexAccess { .. } => "index access",
            ExprKind::ListConstructor { .. } => "list constructor",
            ExprKind::TypeConversion { .. } => "type conversion",
            ExprKind::TypeTest { .. } => "type test",
            ExprKind::Group(_) => "group expression",
            ExprKind::WildcardBindingPattern => "wildcard binding pattern",
            ExprKind::FieldAccess { .. } => "field access",
            ExprKind::MappingConstructor { .. } => "mapping constructor",
            ExprKind::Ternary { .. } => "ternary expression",
        }
    }
}

/// A type descriptor written in source, with its resolved type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDesc {
    pub ty: Option<SemType>,
    pub span: Span,
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Nil,
    Boolean(bool),
    Int(i64),
    Float(f64),
    /// Decimal literals keep their source text; no arithmetic happens here.
    Decimal(String),
    String(String),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    RefEqual,
    RefNotEqual,
    // Logical
    And,
    Or,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseLeftShift,
    BitwiseRightShift,
    BitwiseUnsignedRightShift,
    // Ranges and nil-coalescing
    ClosedRange,
    HalfOpenRange,
    Elvis,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::RefEqual => "===",
            BinOp::RefNotEqual => "!==",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitwiseAnd => "&",
            BinOp::BitwiseOr => "|",
            BinOp::BitwiseXor => "^",
            BinOp::BitwiseLeftShift => "<<",
            BinOp::BitwiseRightShift => ">>",
            BinOp::BitwiseUnsignedRightShift => ">>>",
            BinOp::ClosedRange => "...",
            BinOp::HalfOpenRange => "..<",
            BinOp::Elvis => "?:",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    BitwiseComplement,
    Typeof,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitwiseComplement => "~",
            UnaryOp::Typeof => "typeof",
        }
    }
}
