// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Non-terminating instructions and the contract shared with terminators.

use crate::{BirOperand, ConstValue, InstructionKind, ScopeId};
use bir_ast::{SemType, Span};
use thiserror::Error;

/// Uniform view over instructions and terminators, so generic passes can
/// walk operands without matching on every kind.
pub trait BirInstruction {
    fn kind(&self) -> InstructionKind;

    /// Destination operand, if the instruction writes one.
    fn lhs_operand(&self) -> Option<BirOperand>;

    /// Source operands in a fixed per-kind order.
    fn rhs_operands(&self) -> Vec<BirOperand>;

    /// Replace the source operands in the order `rhs_operands` reports them.
    fn set_rhs_operands(&mut self, operands: &[BirOperand]) -> Result<(), OperandArityError>;

    fn scope(&self) -> ScopeId;

    fn span(&self) -> Span;
}

/// `set_rhs_operands` was handed the wrong number of operands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} takes {expected} source operands, got {found}")]
pub struct OperandArityError {
    pub kind: InstructionKind,
    pub expected: usize,
    pub found: usize,
}

pub(crate) fn assign_operands(
    kind: InstructionKind,
    slots: Vec<&mut BirOperand>,
    operands: &[BirOperand],
) -> Result<(), OperandArityError> {
    if slots.len() != operands.len() {
        return Err(OperandArityError {
            kind,
            expected: slots.len(),
            found: operands.len(),
        });
    }
    for (slot, op) in slots.into_iter().zip(operands) {
        *slot = *op;
    }
    Ok(())
}

/// An instruction that produces a value and falls through.
#[derive(Debug, Clone, PartialEq)]
pub struct NonTerminator {
    /// Destination; for store kinds, the container written to.
    pub lhs: BirOperand,
    pub scope: ScopeId,
    pub span: Span,
    pub kind: NonTerminatorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NonTerminatorKind {
    Move {
        rhs: BirOperand,
    },
    ConstantLoad {
        value: ConstValue,
        ty: Option<SemType>,
    },
    /// Mapping construction.
    NewStructure {
        ty: Option<SemType>,
        entries: Vec<MappingEntry>,
    },
    NewArray {
        element_type: Option<SemType>,
        size: BirOperand,
        values: Vec<BirOperand>,
    },
    NewError {
        ty: Option<SemType>,
        message: BirOperand,
        cause: BirOperand,
        detail: BirOperand,
    },
    NewInstance {
        class_name: String,
    },
    NewTypedesc {
        ty: SemType,
    },
    /// Keyed load or store. Loads read `rhs[key]` into `lhs`; stores write
    /// `rhs` into `lhs[key]`.
    FieldAccess {
        access: FieldAccessKind,
        key: BirOperand,
        rhs: BirOperand,
    },
    TypeCast {
        rhs: BirOperand,
        ty: Option<SemType>,
    },
    TypeTest {
        rhs: BirOperand,
        ty: Option<SemType>,
        negated: bool,
    },
    IsLike {
        rhs: BirOperand,
        ty: Option<SemType>,
    },
    /// Function pointer load.
    FpLoad {
        lookup_key: String,
        closure_maps: Vec<BirOperand>,
    },
    BinaryOp {
        op: InstructionKind,
        rhs1: BirOperand,
        rhs2: BirOperand,
    },
    UnaryOp {
        op: InstructionKind,
        rhs: BirOperand,
    },
    /// Host-specific instruction.
    Platform {
        name: String,
        operands: Vec<BirOperand>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingEntry {
    KeyValue { key: BirOperand, value: BirOperand },
    Spread(BirOperand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAccessKind {
    MapLoad,
    MapStore,
    ArrayLoad,
    ArrayStore,
    ObjectLoad,
    ObjectStore,
    TableLoad,
    TableStore,
    StringLoad,
    XmlLoad,
    XmlSeqLoad,
    XmlSeqStore,
    XmlAttributeLoad,
    XmlAttributeStore,
}

impl FieldAccessKind {
    pub fn kind(self) -> InstructionKind {
        match self {
            FieldAccessKind::MapLoad => InstructionKind::MapLoad,
            FieldAccessKind::MapStore => InstructionKind::MapStore,
            FieldAccessKind::ArrayLoad => InstructionKind::ArrayLoad,
            FieldAccessKind::ArrayStore => InstructionKind::ArrayStore,
            FieldAccessKind::ObjectLoad => InstructionKind::ObjectLoad,
            FieldAccessKind::ObjectStore => InstructionKind::ObjectStore,
            FieldAccessKind::TableLoad => InstructionKind::TableLoad,
            FieldAccessKind::TableStore => InstructionKind::TableStore,
            FieldAccessKind::StringLoad => InstructionKind::StringLoad,
            FieldAccessKind::XmlLoad => InstructionKind::XmlLoad,
            FieldAccessKind::XmlSeqLoad => InstructionKind::XmlSeqLoad,
            FieldAccessKind::XmlSeqStore => InstructionKind::XmlSeqStore,
            FieldAccessKind::XmlAttributeLoad => InstructionKind::XmlAttributeLoad,
            FieldAccessKind::XmlAttributeStore => InstructionKind::XmlAttributeStore,
        }
    }

    pub fn is_store(self) -> bool {
        matches!(
            self,
            FieldAccessKind::MapStore
                | FieldAccessKind::ArrayStore
                | FieldAccessKind::ObjectStore
                | FieldAccessKind::TableStore
                | FieldAccessKind::XmlSeqStore
                | FieldAccessKind::XmlAttributeStore
        )
    }
}

impl NonTerminator {
    pub fn new(lhs: BirOperand, kind: NonTerminatorKind, scope: ScopeId, span: Span) -> Self {
        Self {
            lhs,
            scope,
            span,
            kind,
        }
    }

    fn rhs_slots_mut(&mut self) -> Vec<&mut BirOperand> {
        match &mut self.kind {
            NonTerminatorKind::Move { rhs }
            | NonTerminatorKind::TypeCast { rhs, .. }
            | NonTerminatorKind::TypeTest { rhs, .. }
            | NonTerminatorKind::IsLike { rhs, .. }
            | NonTerminatorKind::UnaryOp { rhs, .. } => vec![rhs],
            NonTerminatorKind::ConstantLoad { .. }
            | NonTerminatorKind::NewInstance { .. }
            | NonTerminatorKind::NewTypedesc { .. } => Vec::new(),
            NonTerminatorKind::NewStructure { entries, .. } => {
                let mut slots = Vec::new();
                for entry in entries {
                    match entry {
                        MappingEntry::KeyValue { key, value } => {
                            slots.push(key);
                            slots.push(value);
                        }
                        MappingEntry::Spread(value) => slots.push(value),
                    }
                }
                slots
            }
            NonTerminatorKind::NewArray { size, values, .. } => {
                let mut slots = vec![size];
                slots.extend(values.iter_mut());
                slots
            }
            NonTerminatorKind::NewError {
                message,
                cause,
                detail,
                ..
            } => vec![message, cause, detail],
            NonTerminatorKind::FieldAccess { key, rhs, .. } => vec![key, rhs],
            NonTerminatorKind::FpLoad { closure_maps, .. } => closure_maps.iter_mut().collect(),
            NonTerminatorKind::BinaryOp { rhs1, rhs2, .. } => vec![rhs1, rhs2],
            NonTerminatorKind::Platform { operands, .. } => operands.iter_mut().collect(),
        }
    }
}

impl BirInstruction for NonTerminator {
    fn kind(&self) -> InstructionKind {
        match &self.kind {
            NonTerminatorKind::Move { .. } => InstructionKind::Move,
            NonTerminatorKind::ConstantLoad { .. } => InstructionKind::ConstLoad,
            NonTerminatorKind::NewStructure { .. } => InstructionKind::NewStructure,
            NonTerminatorKind::NewArray { .. } => InstructionKind::NewArray,
            NonTerminatorKind::NewError { .. } => InstructionKind::NewError,
            NonTerminatorKind::NewInstance { .. } => InstructionKind::NewInstance,
            NonTerminatorKind::NewTypedesc { .. } => InstructionKind::NewTypedesc,
            NonTerminatorKind::FieldAccess { access, .. } => access.kind(),
            NonTerminatorKind::TypeCast { .. } => InstructionKind::TypeCast,
            NonTerminatorKind::TypeTest { .. } => InstructionKind::TypeTest,
            NonTerminatorKind::IsLike { .. } => InstructionKind::IsLike,
            NonTerminatorKind::FpLoad { .. } => InstructionKind::FpLoad,
            NonTerminatorKind::BinaryOp { op, .. } | NonTerminatorKind::UnaryOp { op, .. } => *op,
            NonTerminatorKind::Platform { .. } => InstructionKind::Platform,
        }
    }

    fn lhs_operand(&self) -> Option<BirOperand> {
        Some(self.lhs)
    }

    fn rhs_operands(&self) -> Vec<BirOperand> {
        match &self.kind {
            NonTerminatorKind::Move { rhs }
            | NonTerminatorKind::TypeCast { rhs, .. }
            | NonTerminatorKind::TypeTest { rhs, .. }
            | NonTerminatorKind::IsLike { rhs, .. }
            | NonTerminatorKind::UnaryOp { rhs, .. } => vec![*rhs],
            NonTerminatorKind::ConstantLoad { .. }
            | NonTerminatorKind::NewInstance { .. }
            | NonTerminatorKind::NewTypedesc { .. } => Vec::new(),
            NonTerminatorKind::NewStructure { entries, .. } => entries
                .iter()
                .flat_map(|entry| match entry {
                    MappingEntry::KeyValue { key, value } => vec![*key, *value],
                    MappingEntry::Spread(value) => vec![*value],
                })
                .collect(),
            NonTerminatorKind::NewArray { size, values, .. } => {
                std::iter::once(*size).chain(values.iter().copied()).collect()
            }
            NonTerminatorKind::NewError {
                message,
                cause,
                detail,
                ..
            } => vec![*message, *cause, *detail],
            NonTerminatorKind::FieldAccess { key, rhs, .. } => vec![*key, *rhs],
            NonTerminatorKind::FpLoad { closure_maps, .. } => closure_maps.clone(),
            NonTerminatorKind::BinaryOp { rhs1, rhs2, .. } => vec![*rhs1, *rhs2],
            NonTerminatorKind::Platform { operands, .. } => operands.clone(),
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
