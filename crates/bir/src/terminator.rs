// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Block terminators: control transfer and the concurrency vocabulary.

use crate::instruction::assign_operands;
use crate::{BirInstruction, BirOperand, BlockId, InstructionKind, OperandArityError, ScopeId};
use bir_ast::{PackageId, SemType, Span};
use std::sync::Arc;

/// Fully qualified identity of a called function.
#[derive(Debug, Clone, PartialEq)]
pub struct CalleeRef {
    pub name: String,
    pub package: Arc<PackageId>,
    /// `<org>/<pkg-name>:<name>`
    pub lookup_key: String,
}

/// The last instruction of a basic block.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminator {
    /// Result of calls, waits and receives.
    pub lhs: Option<BirOperand>,
    pub scope: ScopeId,
    pub span: Span,
    pub kind: TerminatorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TerminatorKind {
    Goto {
        target: BlockId,
    },
    Call {
        args: Vec<BirOperand>,
        callee: CalleeRef,
        is_virtual: bool,
        then_bb: BlockId,
    },
    /// Starts the callee on a new strand; `lhs` receives its future.
    AsyncCall {
        args: Vec<BirOperand>,
        callee: CalleeRef,
        then_bb: BlockId,
    },
    Branch {
        op: BirOperand,
        true_bb: BlockId,
        false_bb: BlockId,
    },
    Return,
    Panic {
        error: BirOperand,
    },
    /// Wait for the first of `futures` to complete.
    Wait {
        futures: Vec<BirOperand>,
        then_bb: BlockId,
    },
    /// Wait for every future; results land in the record at `lhs` under `keys`.
    WaitAll {
        keys: Vec<String>,
        futures: Vec<BirOperand>,
        then_bb: BlockId,
    },
    /// Call through a function pointer.
    FpCall {
        fp: BirOperand,
        args: Vec<BirOperand>,
        is_async: bool,
        then_bb: BlockId,
    },
    WorkerReceive {
        channel: String,
        is_same_strand: bool,
        then_bb: BlockId,
    },
    WorkerSend {
        channel: String,
        data: BirOperand,
        is_same_strand: bool,
        is_sync: bool,
        then_bb: BlockId,
    },
    Flush {
        channels: Vec<String>,
        then_bb: BlockId,
    },
    /// Take the global lock before entering `locked_bb`.
    Lock {
        locked_bb: BlockId,
    },
    FieldLock {
        local: BirOperand,
        field: String,
        locked_bb: BlockId,
    },
    Unlock {
        unlock_bb: BlockId,
    },
    /// Receive from whichever of `channels` is ready first.
    WorkerAlternateReceive {
        channels: Vec<String>,
        is_same_strand: bool,
        then_bb: BlockId,
    },
    /// Receive from every `(field, channel)` pair into a record.
    WorkerMultipleReceive {
        receives: Vec<(String, String)>,
        target_type: Option<SemType>,
        is_same_strand: bool,
        then_bb: BlockId,
    },
}

impl Terminator {
    pub fn new(lhs: Option<BirOperand>, kind: TerminatorKind, scope: ScopeId, span: Span) -> Self {
        Self {
            lhs,
            scope,
            span,
            kind,
        }
    }

    /// Blocks control may continue in, in a fixed per-kind order.
    pub fn successors(&self) -> Vec<BlockId> {
        match &self.kind {
            TerminatorKind::Return | TerminatorKind::Panic { .. } => Vec::new(),
            TerminatorKind::Goto { target } => vec![*target],
            TerminatorKind::Branch {
                true_bb, false_bb, ..
            } => vec![*true_bb, *false_bb],
            TerminatorKind::Lock { locked_bb } | TerminatorKind::FieldLock { locked_bb, .. } => {
                vec![*locked_bb]
            }
            TerminatorKind::Unlock { unlock_bb } => vec![*unlock_bb],
            TerminatorKind::Call { then_bb, .. }
            | TerminatorKind::AsyncCall { then_bb, .. }
            | TerminatorKind::Wait { then_bb, .. }
            | TerminatorKind::WaitAll { then_bb, .. }
            | TerminatorKind::FpCall { then_bb, .. }
            | TerminatorKind::WorkerReceive { then_bb, .. }
            | TerminatorKind::WorkerSend { then_bb, .. }
            | TerminatorKind::Flush { then_bb, .. }
            | TerminatorKind::WorkerAlternateReceive { then_bb, .. }
            | TerminatorKind::WorkerMultipleReceive { then_bb, .. } => vec![*then_bb],
        }
    }

    fn rhs_slots_mut(&mut self) -> Vec<&mut BirOperand> {
        match &mut self.kind {
            TerminatorKind::Call { args, .. } | TerminatorKind::AsyncCall { args, .. } => {
                args.iter_mut().collect()
            }
            TerminatorKind::Branch { op, .. } => vec![op],
            TerminatorKind::Panic { error } => vec![error],
            TerminatorKind::Wait { futures, .. } | TerminatorKind::WaitAll { futures, .. } => {
                futures.iter_mut().collect()
            }
            TerminatorKind::FpCall { fp, args, .. } => {
                let mut slots = vec![fp];
                slots.extend(args.iter_mut());
                slots
            }
            TerminatorKind::WorkerSend { data, .. } => vec![data],
            TerminatorKind::FieldLock { local, .. } => vec![local],
            TerminatorKind::Goto { .. }
            | TerminatorKind::Return
            | TerminatorKind::WorkerReceive { .. }
            | TerminatorKind::Flush { .. }
            | TerminatorKind::Lock { .. }
            | TerminatorKind::Unlock { .. }
            | TerminatorKind::WorkerAlternateReceive { .. }
            | TerminatorKind::WorkerMultipleReceive { .. } => Vec::new(),
        }
    }
}

impl BirInstruction for Terminator {
    fn kind(&self) -> InstructionKind {
        match &self.kind {
            TerminatorKind::Goto { .. } => InstructionKind::Goto,
            TerminatorKind::Call { .. } => InstructionKind::Call,
            TerminatorKind::AsyncCall { .. } => InstructionKind::AsyncCall,
            TerminatorKind::Branch { .. } => InstructionKind::Branch,
            TerminatorKind::Return => InstructionKind::Return,
            TerminatorKind::Panic { .. } => InstructionKind::Panic,
            TerminatorKind::Wait { .. } => InstructionKind::Wait,
            TerminatorKind::WaitAll { .. } => InstructionKind::WaitAll,
            TerminatorKind::FpCall { .. } => InstructionKind::FpCall,
            TerminatorKind::WorkerReceive { .. } => InstructionKind::WorkerReceive,
            TerminatorKind::WorkerSend { .. } => InstructionKind::WorkerSend,
            TerminatorKind::Flush { .. } => InstructionKind::Flush,
            TerminatorKind::Lock { .. } => InstructionKind::Lock,
            TerminatorKind::FieldLock { .. } => InstructionKind::FieldLock,
            TerminatorKind::Unlock { .. } => InstructionKind::Unlock,
            TerminatorKind::WorkerAlternateReceive { .. } => InstructionKind::WorkerAlternateReceive,
            TerminatorKind::WorkerMultipleReceive { .. } => InstructionKind::WorkerMultipleReceive,
        }
    }

    fn lhs_operand(&self) -> Option<BirOperand> {
        self.lhs
    }

    fn rhs_operands(&self) -> Vec<BirOperand> {
        match &self.kind {
            TerminatorKind::Call { args, .. } | TerminatorKind::AsyncCall { args, .. } => {
                args.clone()
            }
            TerminatorKind::Branch { op, .. } => vec![*op],
            TerminatorKind::Panic { error } => vec![*error],
            TerminatorKind::Wait { futures, .. } | TerminatorKind::WaitAll { futures, .. } => {
                futures.clone()
            }
            TerminatorKind::FpCall { fp, args, .. } => {
                std::iter::once(*fp).chain(args.iter().copied()).collect()
            }
            TerminatorKind::WorkerSend { data, .. } => vec![*data],
            TerminatorKind::FieldLock { local, .. } => vec![*local],
            TerminatorKind::Goto { .. }
            | TerminatorKind::Return
            | TerminatorKind::WorkerReceive { .. }
            | TerminatorKind::Flush { .. }
            | TerminatorKind::Lock { .. }
            | TerminatorKind::Unlock { .. }
            | TerminatorKind::WorkerAlternateReceive { .. }
            | TerminatorKind::WorkerMultipleReceive { .. } => Vec::new(),
        }
    }

    fn set_rhs_operands(&mut self, operands: &[BirOperand]) -> Result<(), OperandArityError> {
        let kind = self.kind();
        assign_operands(kind, self.rhs_slots_mut(), operands)
    }

    fn scope(&self) -> ScopeId {
        self.scope
    }

    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalId;

    fn op(n: u32) -> BirOperand {
        BirOperand::new(LocalId(n))
    }

    fn term(lhs: Option<u32>, kind: TerminatorKind) -> Terminator {
        Terminator::new(lhs.map(op), kind, ScopeId(0), Span::default())
    }

    fn callee() -> CalleeRef {
        CalleeRef {
            name: "f".into(),
            package: Arc::new(PackageId::anonymous()),
            lookup_key: "$anon/.:f".into(),
        }
    }

    #[test]
    fn successor_counts() {
        assert!(term(None, TerminatorKind::Return).successors().is_empty());
        assert!(term(None, TerminatorKind::Panic { error: op(1) })
            .successors()
            .is_empty());
        assert_eq!(
            term(None, TerminatorKind::Goto { target: BlockId(4) }).successors(),
            vec![BlockId(4)]
        );
        assert_eq!(
            term(
                None,
                TerminatorKind::Branch {
                    op: op(1),
                    true_bb: BlockId(2),
                    false_bb: BlockId(3),
                }
            )
            .successors(),
            vec![BlockId(2), BlockId(3)]
        );
        assert_eq!(
            term(None, TerminatorKind::Lock { locked_bb: BlockId(1) }).successors(),
            vec![BlockId(1)]
        );
    }

    #[test]
    fn concurrency_terminators_follow_the_contract() {
        let send = term(
            None,
            TerminatorKind::WorkerSend {
                channel: "w1".into(),
                data: op(3),
                is_same_strand: false,
                is_sync: true,
                then_bb: BlockId(2),
            },
        );
        assert_eq!(send.kind(), InstructionKind::WorkerSend);
        assert_eq!(send.rhs_operands(), vec![op(3)]);
        assert_eq!(send.successors(), vec![BlockId(2)]);

        let wait_all = term(
            Some(5),
            TerminatorKind::WaitAll {
                keys: vec!["a".into(), "b".into()],
                futures: vec![op(1), op(2)],
                then_bb: BlockId(7),
            },
        );
        assert_eq!(wait_all.kind(), InstructionKind::WaitAll);
        assert_eq!(wait_all.lhs_operand(), Some(op(5)));
        assert_eq!(wait_all.rhs_operands(), vec![op(1), op(2)]);

        let flush = term(
            Some(1),
            TerminatorKind::Flush {
                channels: vec!["w2".into()],
                then_bb: BlockId(3),
            },
        );
        assert!(flush.rhs_operands().is_empty());
        assert_eq!(flush.successors(), vec![BlockId(3)]);
        assert!(flush.kind().is_terminator());
    }

    #[test]
    fn rewrite_call_arguments() {
        let mut call = term(
            Some(4),
            TerminatorKind::Call {
                args: vec![op(1), op(2)],
                callee: callee(),
                is_virtual: false,
                then_bb: BlockId(1),
            },
        );
        call.set_rhs_operands(&[op(2), op(1)]).unwrap();
        assert_eq!(call.rhs_operands(), vec![op(2), op(1)]);
        assert!(call.set_rhs_operands(&[op(1)]).is_err());
    }

    #[test]
    fn fp_call_puts_pointer_first() {
        let mut call = term(
            Some(6),
            TerminatorKind::FpCall {
                fp: op(1),
                args: vec![op(2)],
                is_async: true,
                then_bb: BlockId(1),
            },
        );
        assert_eq!(call.rhs_operands(), vec![op(1), op(2)]);
        call.set_rhs_operands(&[op(5), op(4)]).unwrap();
        assert!(matches!(call.kind, TerminatorKind::FpCall { fp, .. } if fp == op(5)));
    }
}
