// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! BIR function representation - control-flow graph of basic blocks.

use crate::{BirOperand, NonTerminator, Terminator};
use bir_ast::{SemType, Span};
use std::fmt;

/// Index of a basic block in its function's block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// Index of a declaration in its function's local table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u32);

/// Index of a lexical scope in its function's scope list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopeId(pub u32);

/// A lowered function.
#[derive(Debug, Clone)]
pub struct BirFunction {
    pub name: String,
    /// Name before any renaming pass ran.
    pub original_name: String,
    /// `<org>/<pkg-name>:<name>`
    pub lookup_key: String,
    pub span: Span,
    pub return_type: Option<SemType>,
    pub required_params: Vec<BirOperand>,
    /// Always the first local.
    pub return_variable: BirOperand,
    pub local_vars: Vec<BirVariableDcl>,
    /// Block `n` lives at position `n`; block 0 is the entry.
    pub basic_blocks: Vec<BirBasicBlock>,
    /// Scope 0 is the function scope.
    pub scopes: Vec<BirScope>,
}

impl BirFunction {
    pub fn block(&self, id: BlockId) -> Option<&BirBasicBlock> {
        self.basic_blocks.get(id.0 as usize)
    }

    pub fn local(&self, operand: BirOperand) -> Option<&BirVariableDcl> {
        self.local_vars.get(operand.index())
    }

    /// Blocks control can reach directly from `id`.
    pub fn successors(&self, id: BlockId) -> Vec<BlockId> {
        self.block(id)
            .and_then(|b| b.terminator.as_ref())
            .map(Terminator::successors)
            .unwrap_or_default()
    }

    /// Predecessor lists for every block, indexed by block number.
    pub fn predecessors(&self) -> Vec<Vec<BlockId>> {
        let mut preds = vec![Vec::new(); self.basic_blocks.len()];
        for block in &self.basic_blocks {
            for succ in self.successors(block.id) {
                if let Some(list) = preds.get_mut(succ.0 as usize) {
                    if !list.contains(&block.id) {
                        list.push(block.id);
                    }
                }
            }
        }
        preds
    }
}

/// Basic block in the CFG.
#[derive(Debug, Clone)]
pub struct BirBasicBlock {
    pub id: BlockId,
    /// Human-readable label, `<prefix><number>`.
    pub name: String,
    pub instructions: Vec<NonTerminator>,
    /// `None` only while the block is under construction.
    pub terminator: Option<Terminator>,
}

impl BirBasicBlock {
    pub fn new(id: BlockId, prefix: &str) -> Self {
        Self {
            id,
            name: format!("{}{}", prefix, id.0),
            instructions: Vec::new(),
            terminator: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Local,
    Argument,
    Temporary,
    Return,
    Global,
    SelfRef,
    Constant,
    Synthetic,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VarKind::Local => "local",
            VarKind::Argument => "arg",
            VarKind::Temporary => "temp",
            VarKind::Return => "return",
            VarKind::Global => "global",
            VarKind::SelfRef => "self",
            VarKind::Constant => "constant",
            VarKind::Synthetic => "synthetic",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarScope {
    Function,
    Global,
}

/// One entry in a function's local table.
#[derive(Debug, Clone, PartialEq)]
pub struct BirVariableDcl {
    pub name: String,
    pub original_name: String,
    pub kind: VarKind,
    pub scope: VarScope,
    /// `None` for discard sinks and where inference is stubbed.
    pub ty: Option<SemType>,
}

/// A lexical scope. Instructions record the scope they were emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirScope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
}
