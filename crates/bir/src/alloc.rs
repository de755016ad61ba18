// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Operand allocation for one function.

use crate::{BirOperand, BirVariableDcl, LocalId, VarKind, VarScope};
use bir_ast::{SemType, SymbolRef};
use std::collections::HashMap;

/// Hands out local slots in allocation order and remembers which symbol
/// each named slot stands for.
#[derive(Debug, Default)]
pub struct OperandAllocator {
    locals: Vec<BirVariableDcl>,
    bindings: HashMap<SymbolRef, BirOperand>,
}

impl OperandAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, name: String, ty: Option<SemType>, kind: VarKind) -> BirOperand {
        let operand = BirOperand::new(LocalId(self.locals.len() as u32));
        self.locals.push(BirVariableDcl {
            original_name: name.clone(),
            name,
            kind,
            scope: VarScope::Function,
            ty,
        });
        operand
    }

    /// Allocate an intermediate named after its own slot (`%<index>`).
    pub fn allocate_temporary(&mut self, ty: Option<SemType>) -> BirOperand {
        let name = format!("%{}", self.locals.len());
        self.allocate(name, ty, VarKind::Temporary)
    }

    /// Later lookups of `symbol` resolve to `operand`. `symbol` must already
    /// be the identity service's reference key.
    pub fn bind(&mut self, symbol: SymbolRef, operand: BirOperand) {
        self.bindings.insert(symbol, operand);
    }

    pub fn allocate_bound(
        &mut self,
        name: String,
        ty: Option<SemType>,
        kind: VarKind,
        symbol: SymbolRef,
    ) -> BirOperand {
        let operand = self.allocate(name, ty, kind);
        self.bind(symbol, operand);
        operand
    }

    pub fn lookup(&self, symbol: SymbolRef) -> Option<BirOperand> {
        self.bindings.get(&symbol).copied()
    }

    pub fn local(&self, operand: BirOperand) -> Option<&BirVariableDcl> {
        self.locals.get(operand.index())
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    pub fn into_locals(self) -> Vec<BirVariableDcl> {
        self.locals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_allocation_order() {
        let mut alloc = OperandAllocator::new();
        let ret = alloc.allocate("%0".into(), None, VarKind::Return);
        let a = alloc.allocate("a".into(), Some(SemType::Int), VarKind::Argument);
        let t = alloc.allocate_temporary(Some(SemType::Int));
        assert_eq!((ret.index(), a.index(), t.index()), (0, 1, 2));
        assert_eq!(alloc.local(t).map(|d| d.name.as_str()), Some("%2"));
        assert_eq!(alloc.local(t).map(|d| d.kind), Some(VarKind::Temporary));
        assert_eq!(alloc.len(), 3);
    }

    #[test]
    fn bound_symbols_resolve() {
        let mut alloc = OperandAllocator::new();
        let sym = SymbolRef::new(0, 4);
        assert_eq!(alloc.lookup(sym), None);
        let x = alloc.allocate_bound("x".into(), Some(SemType::Int), VarKind::Local, sym);
        assert_eq!(alloc.lookup(sym), Some(x));
        assert_eq!(alloc.local(x).map(|d| d.scope), Some(VarScope::Function));
    }
}
