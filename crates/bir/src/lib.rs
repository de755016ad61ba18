// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! BIR (basic-block intermediate representation) and its generator.
//!
//! BIR is register based: every intermediate value lives in a numbered
//! local, and control flow is an explicit graph of basic blocks, each closed
//! by exactly one terminator. [`gen_bir`] lowers a resolved, type-annotated
//! package AST into a [`BirPackage`].

mod alloc;
mod builder;
mod display;
mod error;
mod function;
mod instruction;
mod kind;
mod operand;
mod options;
mod package;
mod scope;
mod terminator;
mod verify;

pub mod lower;

pub use alloc::OperandAllocator;
pub use builder::{FunctionBuilder, FunctionParts};
pub use error::{BirGenError, BirGenErrorKind, ErrorCategory};
pub use function::{
    BirBasicBlock, BirFunction, BirScope, BirVariableDcl, BlockId, LocalId, ScopeId, VarKind,
    VarScope,
};
pub use instruction::{
    BirInstruction, FieldAccessKind, MappingEntry, NonTerminator, NonTerminatorKind,
    OperandArityError,
};
pub use kind::{InstructionKind, KindFamily};
pub use lower::{gen_bir, gen_bir_with_options};
pub use operand::{BirOperand, ConstValue};
pub use options::BirGenOptions;
pub use package::{
    BirConstant, BirGlobalVariableDcl, BirImportModule, BirPackage, BirTypeDefinition,
};
pub use scope::{LoopContext, LoopStack, ScopeTree};
pub use terminator::{CalleeRef, Terminator, TerminatorKind};
pub use verify::verify_function;
