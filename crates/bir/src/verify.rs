// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Structural verification of lowered functions.
//!
//! Checks the invariants the builder promises so later passes can rely on
//! them: every block closed by exactly one terminator, every successor
//! present, block numbers matching their positions, a gap-free local table
//! starting with the return slot, and every operand and scope reference in
//! range.

use crate::error::{BirGenError, BirGenErrorKind};
use crate::{BirFunction, BirInstruction, BirOperand, ScopeId, VarKind};

pub fn verify_function(function: &BirFunction) -> Result<(), BirGenError> {
    FunctionVerifier { function }.validate()
}

struct FunctionVerifier<'a> {
    function: &'a BirFunction,
}

impl<'a> FunctionVerifier<'a> {
    fn validate(&self) -> Result<(), BirGenError> {
        self.validate_locals()?;
        self.validate_scopes()?;
        self.validate_blocks()?;
        Ok(())
    }

    fn error(&self, reason: String) -> BirGenError {
        BirGenError::new(
            BirGenErrorKind::Verification {
                function: self.function.name.clone(),
                reason,
            },
            self.function.span,
        )
    }

    fn validate_locals(&self) -> Result<(), BirGenError> {
        let f = self.function;
        match f.local_vars.first() {
            Some(slot) if slot.kind == VarKind::Return => {}
            Some(slot) => {
                return Err(self.error(format!(
                    "local 0 must be the return slot, found {} `{}`",
                    slot.kind, slot.name
                )))
            }
            None => return Err(self.error("no return slot".to_string())),
        }
        if f.return_variable.index() != 0 {
            return Err(self.error(format!(
                "return variable points at local {}",
                f.return_variable.index()
            )));
        }
        for (i, param) in f.required_params.iter().enumerate() {
            self.check_operand(*param, "parameter list")?;
            if f.local(*param).map(|d| d.kind) != Some(VarKind::Argument) {
                return Err(self.error(format!("parameter {} is not an argument local", i)));
            }
        }
        Ok(())
    }

    fn validate_scopes(&self) -> Result<(), BirGenError> {
        for (i, scope) in self.function.scopes.iter().enumerate() {
            if scope.id.0 as usize != i {
                return Err(self.error(format!("scope at position {} has id {}", i, scope.id.0)));
            }
            if let Some(parent) = scope.parent {
                if parent.0 as usize >= i {
                    return Err(self.error(format!(
                        "scope {} has parent {} created after it",
                        i, parent.0
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_blocks(&self) -> Result<(), BirGenError> {
        let f = self.function;
        if f.basic_blocks.is_empty() {
            return Err(self.error("no entry block".to_string()));
        }
        for (i, block) in f.basic_blocks.iter().enumerate() {
            if block.id.0 as usize != i {
                return Err(self.error(format!(
                    "block {} stored at position {}",
                    block.name, i
                )));
            }
            for inst in &block.instructions {
                self.check_instruction(inst, &block.name)?;
            }
            let term = block
                .terminator
                .as_ref()
                .ok_or_else(|| self.error(format!("block {} has no terminator", block.name)))?;
            self.check_instruction(term, &block.name)?;
            for succ in term.successors() {
                if f.block(succ).is_none() {
                    return Err(self.error(format!(
                        "block {} jumps to missing block {}",
                        block.name, succ.0
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_instruction(&self, inst: &impl BirInstruction, block: &str) -> Result<(), BirGenError> {
        let context = format!("{} in {}", inst.kind(), block);
        if let Some(lhs) = inst.lhs_operand() {
            self.check_operand(lhs, &context)?;
        }
        for rhs in inst.rhs_operands() {
            self.check_operand(rhs, &context)?;
        }
        self.check_scope(inst.scope(), &context)
    }

    fn check_operand(&self, op: BirOperand, context: &str) -> Result<(), BirGenError> {
        if op.index() >= self.function.local_vars.len() {
            return Err(self.error(format!(
                "{} refers to local {} of {}",
                context,
                op.index(),
                self.function.local_vars.len()
            )));
        }
        Ok(())
    }

    fn check_scope(&self, scope: ScopeId, context: &str) -> Result<(), BirGenError> {
        if scope.0 as usize >= self.function.scopes.len() {
            return Err(self.error(format!("{} is in unknown scope {}", context, scope.0)));
        }
        Ok(())
    }
}
