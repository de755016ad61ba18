// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Expression lowering.

use super::BirLowerer;
use crate::error::BirGenError;
use crate::{
    BirOperand, BlockId, ConstValue, FieldAccessKind, InstructionKind, MappingEntry,
    NonTerminatorKind, TerminatorKind,
};
use bir_ast::expr::{BinOp, Expr, ExprKind, Literal, UnaryOp};
use bir_ast::{Ident, SemType, Span, SymbolRef};

/// Where an expression's value ended up and where control continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ExprEffect {
    pub result: BirOperand,
    pub block: BlockId,
}

impl ExprEffect {
    fn new(result: BirOperand, block: BlockId) -> Self {
        Self { result, block }
    }
}

impl<'a> BirLowerer<'a> {
    pub(super) fn lower_expr(&mut self, bb: BlockId, expr: &Expr) -> Result<ExprEffect, BirGenError> {
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let result = self.load_constant(bb, ConstValue::from(lit), expr.ty.clone(), expr.span)?;
                Ok(ExprEffect::new(result, bb))
            }

            ExprKind::VarRef { name, symbol } => self.lower_var_ref(bb, name, *symbol),

            ExprKind::Binary { op, lhs, rhs } => {
                self.lower_binary(bb, *op, lhs, rhs, expr.ty.clone(), expr.span)
            }

            ExprKind::Unary { op, operand } => {
                let kind = unary_kind(*op, expr.span)?;
                let value = self.lower_expr(bb, operand)?;
                let result = self.builder.locals().allocate_temporary(expr.ty.clone());
                self.builder.emit(
                    value.block,
                    result,
                    NonTerminatorKind::UnaryOp {
                        op: kind,
                        rhs: value.result,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, value.block))
            }

            ExprKind::Invocation {
                pkg_alias,
                name,
                args,
            } => self.lower_invocation(bb, pkg_alias.as_ref(), name, args, expr),

            // Index first, then container; the load lands where the container left off.
            // The result slot is allocated last, as for binary operators.
            ExprKind::IndexAccess { container, index } => {
                let key = self.lower_expr(bb, index)?;
                let base = self.lower_expr(key.block, container)?;
                let access = if container.ty == Some(SemType::Map) {
                    FieldAccessKind::MapLoad
                } else {
                    FieldAccessKind::ArrayLoad
                };
                let result = self.builder.locals().allocate_temporary(expr.ty.clone());
                self.builder.emit(
                    base.block,
                    result,
                    NonTerminatorKind::FieldAccess {
                        access,
                        key: key.result,
                        rhs: base.result,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, base.block))
            }

            ExprKind::ListConstructor {
                elements,
                element_type,
            } => {
                let mut current = bb;
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    let value = self.lower_expr(current, element)?;
                    current = value.block;
                    values.push(value.result);
                }
                let size = self.load_constant(
                    current,
                    ConstValue::Int(elements.len() as i64),
                    Some(SemType::Int),
                    expr.span,
                )?;
                let result = self.builder.locals().allocate_temporary(Some(SemType::List));
                self.builder.emit(
                    current,
                    result,
                    NonTerminatorKind::NewArray {
                        element_type: element_type.clone(),
                        size,
                        values,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, current))
            }

            ExprKind::MappingConstructor { fields } => {
                let mut current = bb;
                let mut entries = Vec::with_capacity(fields.len());
                for (key, value) in fields {
                    let key = self.load_field_name(current, &key.value, key.span)?;
                    let value = self.lower_expr(current, value)?;
                    current = value.block;
                    entries.push(MappingEntry::KeyValue {
                        key,
                        value: value.result,
                    });
                }
                let ty = expr.ty.clone().or(Some(SemType::Map));
                let result = self.builder.locals().allocate_temporary(ty.clone());
                self.builder.emit(
                    current,
                    result,
                    NonTerminatorKind::NewStructure { ty, entries },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, current))
            }

            ExprKind::FieldAccess { expr: base, field } => {
                let base = self.lower_expr(bb, base)?;
                let key = self.load_field_name(base.block, &field.value, field.span)?;
                let result = self.builder.locals().allocate_temporary(expr.ty.clone());
                self.builder.emit(
                    base.block,
                    result,
                    NonTerminatorKind::FieldAccess {
                        access: FieldAccessKind::MapLoad,
                        key,
                        rhs: base.result,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, base.block))
            }

            ExprKind::TypeConversion { expr: source, target } => {
                let value = self.lower_expr(bb, source)?;
                let ty = target.ty.clone().or_else(|| expr.ty.clone());
                let result = self.builder.locals().allocate_temporary(ty.clone());
                self.builder.emit(
                    value.block,
                    result,
                    NonTerminatorKind::TypeCast {
                        rhs: value.result,
                        ty,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, value.block))
            }

            ExprKind::TypeTest {
                expr: source,
                target,
                negated,
            } => {
                let value = self.lower_expr(bb, source)?;
                let result = self.builder.locals().allocate_temporary(Some(SemType::Boolean));
                self.builder.emit(
                    value.block,
                    result,
                    NonTerminatorKind::TypeTest {
                        rhs: value.result,
                        ty: target.ty.clone(),
                        negated: *negated,
                    },
                    expr.span,
                )?;
                Ok(ExprEffect::new(result, value.block))
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.lower_ternary(bb, cond, then_expr, else_expr, expr),

            ExprKind::Group(inner) => self.lower_expr(bb, inner),

            // Discard sink: a slot nobody reads.
            ExprKind::WildcardBindingPattern => {
                let result = self.builder.locals().allocate_temporary(None);
                Ok(ExprEffect::new(result, bb))
            }
        }
    }

    /// Result temporaries are numbered after their operands, so `1 + 2`
    /// prints as `%3 = + %1 %2` rather than with the result slot first.
    pub(super) fn lower_binary(
        &mut self,
        bb: BlockId,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        ty: Option<SemType>,
        span: Span,
    ) -> Result<ExprEffect, BirGenError> {
        let kind = binary_kind(op, span)?;
        let left = self.lower_expr(bb, lhs)?;
        let right = self.lower_expr(left.block, rhs)?;
        let result = self.builder.locals().allocate_temporary(ty);
        self.builder.emit(
            right.block,
            result,
            NonTerminatorKind::BinaryOp {
                op: kind,
                rhs1: left.result,
                rhs2: right.result,
            },
            span,
        )?;
        Ok(ExprEffect::new(result, right.block))
    }

    /// Locals and parameters first, then package constants.
    fn lower_var_ref(
        &mut self,
        bb: BlockId,
        name: &Ident,
        symbol: SymbolRef,
    ) -> Result<ExprEffect, BirGenError> {
        let key = self.unit.ctx.ref_symbol(symbol);
        if let Some(local) = self.builder.locals().lookup(key) {
            return Ok(ExprEffect::new(local, bb));
        }
        if let Some(constant) = self.unit.constants.get(&key) {
            let (value, ty) = (constant.value.clone(), constant.ty.clone());
            let result = self.load_constant(bb, value, ty, name.span)?;
            return Ok(ExprEffect::new(result, bb));
        }
        Err(BirGenError::unresolved_variable(name.value.clone(), name.span))
    }

    /// Arguments left to right, then a call terminator; the value is
    /// available in the post-call block.
    fn lower_invocation(
        &mut self,
        bb: BlockId,
        pkg_alias: Option<&Ident>,
        name: &Ident,
        args: &[Expr],
        expr: &Expr,
    ) -> Result<ExprEffect, BirGenError> {
        let callee = self.resolve_callee(pkg_alias, name)?;
        let mut current = bb;
        let mut arg_operands = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.lower_expr(current, arg)?;
            current = value.block;
            arg_operands.push(value.result);
        }
        let then_bb = self.builder.add_block();
        let result = self.builder.locals().allocate_temporary(expr.ty.clone());
        self.builder.terminate(
            current,
            Some(result),
            TerminatorKind::Call {
                args: arg_operands,
                callee,
                is_virtual: false,
                then_bb,
            },
            expr.span,
        )?;
        Ok(ExprEffect::new(result, then_bb))
    }

    /// `c ? a : b`: both arms write one result slot and meet in a merge block.
    fn lower_ternary(
        &mut self,
        bb: BlockId,
        cond: &Expr,
        then_expr: &Expr,
        else_expr: &Expr,
        expr: &Expr,
    ) -> Result<ExprEffect, BirGenError> {
        let cond = self.lower_expr(bb, cond)?;
        let result = self.builder.locals().allocate_temporary(expr.ty.clone());
        let then_bb = self.builder.add_block();
        let else_bb = self.builder.add_block();
        self.branch(cond, then_bb, else_bb, expr.span)?;

        let then_value = self.lower_expr(then_bb, then_expr)?;
        self.builder.emit(
            then_value.block,
            result,
            NonTerminatorKind::Move {
                rhs: then_value.result,
            },
            then_expr.span,
        )?;
        let else_value = self.lower_expr(else_bb, else_expr)?;
        self.builder.emit(
            else_value.block,
            result,
            NonTerminatorKind::Move {
                rhs: else_value.result,
            },
            else_expr.span,
        )?;

        let merge = self.builder.add_block();
        self.goto(then_value.block, merge, expr.span)?;
        self.goto(else_value.block, merge, expr.span)?;
        Ok(ExprEffect::new(result, merge))
    }

    fn load_constant(
        &mut self,
        bb: BlockId,
        value: ConstValue,
        ty: Option<SemType>,
        span: Span,
    ) -> Result<BirOperand, BirGenError> {
        let result = self.builder.locals().allocate_temporary(ty.clone());
        self.builder
            .emit(bb, result, NonTerminatorKind::ConstantLoad { value, ty }, span)?;
        Ok(result)
    }

    /// Field names are string keys.
    pub(super) fn load_field_name(
        &mut self,
        bb: BlockId,
        name: &str,
        span: Span,
    ) -> Result<BirOperand, BirGenError> {
        let value = ConstValue::from(&Literal::String(name.to_string()));
        self.load_constant(bb, value, Some(SemType::String), span)
    }
}

fn binary_kind(op: BinOp, span: Span) -> Result<InstructionKind, BirGenError> {
    let kind = match op {
        BinOp::Add => InstructionKind::Add,
        BinOp::Sub => InstructionKind::Sub,
        BinOp::Mul => InstructionKind::Mul,
        BinOp::Div => InstructionKind::Div,
        BinOp::Mod => InstructionKind::Mod,
        BinOp::Equal => InstructionKind::Equal,
        BinOp::NotEqual => InstructionKind::NotEqual,
        BinOp::GreaterThan => InstructionKind::GreaterThan,
        BinOp::GreaterEqual => InstructionKind::GreaterEqual,
        BinOp::LessThan => InstructionKind::LessThan,
        BinOp::LessEqual => InstructionKind::LessEqual,
        BinOp::RefEqual => InstructionKind::RefEqual,
        BinOp::RefNotEqual => InstructionKind::RefNotEqual,
        BinOp::And => InstructionKind::And,
        BinOp::Or => InstructionKind::Or,
        BinOp::BitwiseAnd => InstructionKind::BitwiseAnd,
        BinOp::BitwiseOr => InstructionKind::BitwiseOr,
        BinOp::BitwiseXor => InstructionKind::BitwiseXor,
        BinOp::BitwiseLeftShift => InstructionKind::BitwiseLeftShift,
        BinOp::BitwiseRightShift => InstructionKind::BitwiseRightShift,
        BinOp::BitwiseUnsignedRightShift => InstructionKind::BitwiseUnsignedRightShift,
        BinOp::ClosedRange | BinOp::HalfOpenRange | BinOp::Elvis => {
            return Err(BirGenError::unsupported_operator(op.symbol(), span))
        }
    };
    Ok(kind)
}

fn unary_kind(op: UnaryOp, span: Span) -> Result<InstructionKind, BirGenError> {
    match op {
        UnaryOp::Not => Ok(InstructionKind::Not),
        UnaryOp::Negate => Ok(InstructionKind::Negate),
        UnaryOp::Typeof => Ok(InstructionKind::Typeof),
        UnaryOp::Plus | UnaryOp::BitwiseComplement => {
            Err(BirGenError::unsupported_operator(op.symbol(), span))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_table_is_total_over_supported_set() {
        assert_eq!(binary_kind(BinOp::Add, Span::default()), Ok(InstructionKind::Add));
        assert_eq!(
            binary_kind(BinOp::BitwiseUnsignedRightShift, Span::default()),
            Ok(InstructionKind::BitwiseUnsignedRightShift)
        );
        for op in [BinOp::ClosedRange, BinOp::HalfOpenRange, BinOp::Elvis] {
            assert!(binary_kind(op, Span::default()).is_err());
        }
        assert_eq!(unary_kind(UnaryOp::Not, Span::default()), Ok(InstructionKind::Not));
        assert!(unary_kind(UnaryOp::BitwiseComplement, Span::default()).is_err());
    }
}
