// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Top-level declarations.

use crate::expr::Expr;
use crate::stmt::Block;
use crate::{Ident, PackageId, SemType, Span, SymbolRef};

/// One compiled module: everything `gen_bir` consumes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub package_id: PackageId,
    pub imports: Vec<ImportPackage>,
    pub type_definitions: Vec<TypeDefinition>,
    pub global_vars: Vec<GlobalVariable>,
    pub constants: Vec<Constant>,
    pub functions: Vec<Function>,
}

/// `import org/a.b version 1.0.0 as alias;` Every part is optional.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportPackage {
    pub org_name: Option<Ident>,
    pub pkg_name_comps: Vec<Ident>,
    pub version: Option<Ident>,
    pub alias: Option<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDefinition {
    pub name: Ident,
    pub ty: Option<SemType>,
    pub span: Span,
}

/// Module-level variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalVariable {
    pub name: Ident,
    pub symbol: SymbolRef,
    pub ty: Option<SemType>,
    pub span: Span,
}

/// Module-level constant. Its value expression has already been checked
/// to be constant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    pub name: Ident,
    pub symbol: SymbolRef,
    pub ty: Option<SemType>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<SemType>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: Ident,
    pub symbol: SymbolRef,
    pub ty: Option<SemType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionBody {
    /// `{ ... }`
    Block(Block),
    /// `=> expr;`
    Expr(Expr),
    /// `= external;`
    External,
}
