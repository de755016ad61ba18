// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! FunctionBuilder - helper for CFG construction during lowering.

use crate::alloc::OperandAllocator;
use crate::error::{BirGenError, BirGenErrorKind};
use crate::scope::{LoopStack, ScopeTree};
use crate::{
    BirBasicBlock, BirOperand, BirScope, BirVariableDcl, BlockId, NonTerminator,
    NonTerminatorKind, Terminator, TerminatorKind,
};
use bir_ast::Span;

/// Everything a finished builder hands back.
#[derive(Debug)]
pub struct FunctionParts {
    pub basic_blocks: Vec<BirBasicBlock>,
    pub local_vars: Vec<BirVariableDcl>,
    pub scopes: Vec<BirScope>,
}

/// Owns one function's blocks, locals, scopes and loop stack while it is
/// being lowered. Blocks are addressed by [`BlockId`]; a block accepts
/// instructions until its terminator is set, and the terminator can be set
/// only once.
#[derive(Debug)]
pub struct FunctionBuilder {
    blocks: Vec<BirBasicBlock>,
    block_prefix: String,
    locals: OperandAllocator,
    scopes: ScopeTree,
    loops: LoopStack,
}

impl FunctionBuilder {
    pub fn new(block_prefix: impl Into<String>) -> Self {
        Self {
            blocks: Vec::new(),
            block_prefix: block_prefix.into(),
            locals: OperandAllocator::new(),
            scopes: ScopeTree::new(),
            loops: LoopStack::default(),
        }
    }

    pub fn add_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BirBasicBlock::new(id, &self.block_prefix));
        tracing::trace!(block = id.0, "new block");
        id
    }

    pub fn locals(&mut self) -> &mut OperandAllocator {
        &mut self.locals
    }

    pub fn loops(&mut self) -> &mut LoopStack {
        &mut self.loops
    }

    pub fn scopes(&mut self) -> &mut ScopeTree {
        &mut self.scopes
    }

    pub fn block(&self, id: BlockId) -> Option<&BirBasicBlock> {
        self.blocks.get(id.0 as usize)
    }

    fn open_block(&mut self, id: BlockId) -> Result<&mut BirBasicBlock, BirGenError> {
        let block = self
            .blocks
            .get_mut(id.0 as usize)
            .ok_or_else(|| BirGenError::invariant(BirGenErrorKind::UnknownBlock { number: id.0 }))?;
        if block.terminator.is_some() {
            return Err(BirGenError::invariant(
                BirGenErrorKind::BlockAlreadyTerminated {
                    block: block.name.clone(),
                },
            ));
        }
        Ok(block)
    }

    /// Append an instruction to `block` in the current scope.
    pub fn emit(
        &mut self,
        block: BlockId,
        lhs: BirOperand,
        kind: NonTerminatorKind,
        span: Span,
    ) -> Result<(), BirGenError> {
        let scope = self.scopes.current();
        self.open_block(block)?
            .instructions
            .push(NonTerminator::new(lhs, kind, scope, span));
        Ok(())
    }

    /// Close `block`.
    pub fn terminate(
        &mut self,
        block: BlockId,
        lhs: Option<BirOperand>,
        kind: TerminatorKind,
        span: Span,
    ) -> Result<(), BirGenError> {
        let scope = self.scopes.current();
        self.open_block(block)?.terminator = Some(Terminator::new(lhs, kind, scope, span));
        Ok(())
    }

    /// Fails if any block was left without a terminator.
    pub fn finish(self) -> Result<FunctionParts, BirGenError> {
        if let Some(open) = self.blocks.iter().find(|b| b.terminator.is_none()) {
            return Err(BirGenError::invariant(BirGenErrorKind::UnterminatedBlock {
                block: open.name.clone(),
            }));
        }
        Ok(FunctionParts {
            basic_blocks: self.blocks,
            local_vars: self.locals.into_locals(),
            scopes: self.scopes.into_scopes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstValue, ScopeId, VarKind};

    #[test]
    fn blocks_are_numbered_in_creation_order() {
        let mut b = FunctionBuilder::new("bb");
        let b0 = b.add_block();
        let b1 = b.add_block();
        assert_eq!((b0, b1), (BlockId(0), BlockId(1)));
        assert_eq!(b.block(b1).map(|blk| blk.name.as_str()), Some("bb1"));
    }

    #[test]
    fn terminator_is_set_once() {
        let mut b = FunctionBuilder::new("bb");
        let bb = b.add_block();
        b.terminate(bb, None, TerminatorKind::Return, Span::default())
            .unwrap();
        let err = b
            .terminate(bb, None, TerminatorKind::Return, Span::default())
            .unwrap_err();
        assert_eq!(
            err.kind,
            BirGenErrorKind::BlockAlreadyTerminated {
                block: "bb0".into()
            }
        );
    }

    #[test]
    fn no_emission_after_terminator() {
        let mut b = FunctionBuilder::new("bb");
        let bb = b.add_block();
        let t = b.locals().allocate_temporary(None);
        b.terminate(bb, None, TerminatorKind::Return, Span::default())
            .unwrap();
        let load = NonTerminatorKind::ConstantLoad {
            value: ConstValue::Int(1),
            ty: None,
        };
        assert!(b.emit(bb, t, load, Span::default()).is_err());
    }

    #[test]
    fn unknown_block_is_rejected() {
        let mut b = FunctionBuilder::new("bb");
        let err = b
            .terminate(BlockId(3), None, TerminatorKind::Return, Span::default())
            .unwrap_err();
        assert_eq!(err.kind, BirGenErrorKind::UnknownBlock { number: 3 });
    }

    #[test]
    fn finish_requires_every_block_terminated() {
        let mut b = FunctionBuilder::new("L");
        let b0 = b.add_block();
        let b1 = b.add_block();
        b.terminate(b0, None, TerminatorKind::Goto { target: b1 }, Span::default())
            .unwrap();
        let err = b.finish().unwrap_err();
        assert_eq!(
            err.kind,
            BirGenErrorKind::UnterminatedBlock { block: "L1".into() }
        );
    }

    #[test]
    fn instructions_record_current_scope() {
        let mut b = FunctionBuilder::new("bb");
        let bb = b.add_block();
        let ret = b.locals().allocate("%0".into(), None, VarKind::Return);
        let tmp = b.locals().allocate_temporary(None);
        let inner = b.scopes().enter();
        b.emit(bb, ret, NonTerminatorKind::Move { rhs: tmp }, Span::default())
            .unwrap();
        b.scopes().exit();
        b.terminate(bb, None, TerminatorKind::Return, Span::default())
            .unwrap();
        let parts = b.finish().unwrap();
        let block = &parts.basic_blocks[0];
        assert_eq!(block.instructions[0].scope, inner);
        assert_eq!(block.terminator.as_ref().map(|t| t.scope), Some(ScopeId(0)));
        assert_eq!(parts.scopes.len(), 2);
        assert_eq!(parts.local_vars.len(), 2);
    }
}
