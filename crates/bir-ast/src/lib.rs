// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Input syntax tree for BIR generation.
//!
//! Nodes arrive here after symbol resolution and type inference: every
//! expression carries its determined type and every reference carries the
//! symbol it resolved to.

#[cfg(any(test, feature = "test-util"))]
pub mod build;
pub mod decl;
pub mod expr;
pub mod package_id;
pub mod span;
pub mod stmt;
pub mod symbol;
pub mod types;

pub use package_id::PackageId;
pub use span::Span;
pub use symbol::SymbolRef;
pub use types::SemType;

/// An identifier as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub value: String,
    pub span: Span,
}

impl Ident {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}
