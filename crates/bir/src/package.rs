// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Package-level BIR nodes.

use crate::{BirFunction, ConstValue, VarKind, VarScope};
use bir_ast::{PackageId, SemType, Span, SymbolRef};
use std::sync::Arc;

/// One lowered module. Owns all of its functions.
#[derive(Debug, Clone)]
pub struct BirPackage {
    pub package_id: Arc<PackageId>,
    pub import_modules: Vec<BirImportModule>,
    pub type_definitions: Vec<BirTypeDefinition>,
    pub global_vars: Vec<BirGlobalVariableDcl>,
    pub constants: Vec<BirConstant>,
    pub functions: Vec<BirFunction>,
    /// Position of the entry point in `functions`.
    pub main_function: Option<usize>,
}

impl BirPackage {
    pub fn new(package_id: Arc<PackageId>) -> Self {
        Self {
            package_id,
            import_modules: Vec::new(),
            type_definitions: Vec::new(),
            global_vars: Vec::new(),
            constants: Vec::new(),
            functions: Vec::new(),
            main_function: None,
        }
    }

    pub fn main_function(&self) -> Option<&BirFunction> {
        self.main_function.and_then(|i| self.functions.get(i))
    }

    pub fn function(&self, name: &str) -> Option<&BirFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BirImportModule {
    pub package_id: Arc<PackageId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BirTypeDefinition {
    pub name: String,
    pub original_name: String,
    pub ty: SemType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BirGlobalVariableDcl {
    pub name: String,
    pub original_name: String,
    pub kind: VarKind,
    pub scope: VarScope,
    pub ty: Option<SemType>,
    pub span: Span,
}

/// A package constant. Only literal initializers are representable.
#[derive(Debug, Clone, PartialEq)]
pub struct BirConstant {
    pub name: String,
    pub symbol: SymbolRef,
    pub ty: Option<SemType>,
    pub value: ConstValue,
    pub span: Span,
}
