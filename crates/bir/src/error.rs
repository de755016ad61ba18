// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! BIR generation errors.
//!
//! Every failure aborts lowering of the whole compilation unit. None of them
//! is a user-facing diagnostic: each one means either that a construct has no
//! lowering rule yet or that the builder broke one of its own invariants.

use bir_ast::Span;
use thiserror::Error;

/// A fatal BIR generation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct BirGenError {
    pub kind: BirGenErrorKind,
    pub span: Span,
}

/// Broad classification of [`BirGenErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Reached a node, operator or form with no lowering rule.
    UnsupportedConstruct,
    /// A variable or import alias is missing from every binding table.
    UnresolvedReference,
    /// The builder itself is inconsistent.
    BuilderInvariant,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BirGenErrorKind {
    #[error("unsupported statement: {construct}")]
    UnsupportedStatement { construct: &'static str },

    #[error("unsupported expression: {construct}")]
    UnsupportedExpression { construct: &'static str },

    #[error("unsupported operator `{op}`")]
    UnsupportedOperator { op: &'static str },

    #[error("unsupported assignment target: {construct}")]
    UnsupportedAssignmentTarget { construct: &'static str },

    #[error("unsupported body for function `{function}`: {reason}")]
    UnsupportedFunctionBody {
        function: String,
        reason: &'static str,
    },

    #[error("constant `{name}` is not initialized with a literal")]
    UnsupportedConstant { name: String },

    #[error("unresolved variable `{name}`")]
    UnresolvedVariable { name: String },

    #[error("unresolved import alias `{alias}`")]
    UnresolvedImport { alias: String },

    #[error("{statement} outside of a loop")]
    NoEnclosingLoop { statement: &'static str },

    #[error("block {block} already has a terminator")]
    BlockAlreadyTerminated { block: String },

    #[error("block {block} has no terminator")]
    UnterminatedBlock { block: String },

    #[error("no block numbered {number}")]
    UnknownBlock { number: u32 },

    #[error("malformed function `{function}`: {reason}")]
    Verification { function: String, reason: String },
}

impl BirGenErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BirGenErrorKind::UnsupportedStatement { .. }
            | BirGenErrorKind::UnsupportedExpression { .. }
            | BirGenErrorKind::UnsupportedOperator { .. }
            | BirGenErrorKind::UnsupportedAssignmentTarget { .. }
            | BirGenErrorKind::UnsupportedFunctionBody { .. }
            | BirGenErrorKind::UnsupportedConstant { .. } => ErrorCategory::UnsupportedConstruct,
            BirGenErrorKind::UnresolvedVariable { .. } | BirGenErrorKind::UnresolvedImport { .. } => {
                ErrorCategory::UnresolvedReference
            }
            BirGenErrorKind::NoEnclosingLoop { .. }
            | BirGenErrorKind::BlockAlreadyTerminated { .. }
            | BirGenErrorKind::UnterminatedBlock { .. }
            | BirGenErrorKind::UnknownBlock { .. }
            | BirGenErrorKind::Verification { .. } => ErrorCategory::BuilderInvariant,
        }
    }
}

impl BirGenError {
    pub fn new(kind: BirGenErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn unsupported_statement(construct: &'static str, span: Span) -> Self {
        Self::new(BirGenErrorKind::UnsupportedStatement { construct }, span)
    }

    pub fn unsupported_expression(construct: &'static str, span: Span) -> Self {
        Self::new(BirGenErrorKind::UnsupportedExpression { construct }, span)
    }

    pub fn unsupported_operator(op: &'static str, span: Span) -> Self {
        Self::new(BirGenErrorKind::UnsupportedOperator { op }, span)
    }

    pub fn unsupported_target(construct: &'static str, span: Span) -> Self {
        Self::new(BirGenErrorKind::UnsupportedAssignmentTarget { construct }, span)
    }

    pub fn unresolved_variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(
            BirGenErrorKind::UnresolvedVariable { name: name.into() },
            span,
        )
    }

    pub fn unresolved_import(alias: impl Into<String>, span: Span) -> Self {
        Self::new(
            BirGenErrorKind::UnresolvedImport {
                alias: alias.into(),
            },
            span,
        )
    }

    /// Builder-invariant errors carry no source position.
    pub fn invariant(kind: BirGenErrorKind) -> Self {
        Self::new(kind, Span::default())
    }
}
