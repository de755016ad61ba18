// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::expr::{BinOp, Expr};
use crate::{Ident, SemType, Span, SymbolRef};

/// A statement in the AST.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// A braced statement list. Opens a lexical scope.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Expr(Expr),
    Block(Block),
    /// `else if` chains arrive as an `If` in `else_stmt`.
    If {
        cond: Expr,
        then_body: Block,
        else_stmt: Option<Box<Stmt>>,
    },
    While { cond: Expr, body: Block },
    Return(Option<Expr>),
    Break,
    Continue,
    VarDef(VarDef),
    /// `target = value`
    Assign { target: Expr, value: Expr },
    /// `target op= value`; `ty` is the determined type of the combined value.
    CompoundAssign {
        op: BinOp,
        target: Expr,
        value: Expr,
        ty: Option<SemType>,
    },
    Panic(Expr),
    Foreach {
        var: VarDef,
        collection: Expr,
        body: Block,
    },
    Lock(Block),
}

impl StmtKind {
    /// Short construct name for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Expr(_) => "expression statement",
            StmtKind::Block(_) => "block",
            StmtKind::If { .. } => "if statement",
            StmtKind::While { .. } => "while statement",
            StmtKind::Return(_) => "return statement",
            StmtKind::Break => "break statement",
            StmtKind::Continue => "continue statement",
            StmtKind::VarDef(_) => "variable definition",
            StmtKind::Assign { .. } => "assignment",
            StmtKind::CompoundAssign { .. } => "compound assignment",
            StmtKind::Panic(_) => "panic statement",
            StmtKind::Foreach { .. } => "foreach statement",
            StmtKind::Lock(_) => "lock statement",
        }
    }
}

/// `T name = init;` or `T name;`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarDef {
    pub name: Ident,
    pub symbol: SymbolRef,
    pub ty: Option<SemType>,
    pub init: Option<Expr>,
}
