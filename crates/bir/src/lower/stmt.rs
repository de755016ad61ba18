// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Statement lowering.
//!
//! Each statement is lowered into the block control currently sits in and
//! reports where control continues. `None` means control left (return,
//! break, continue, panic) and nothing more may be appended on this path.

use super::expr::ExprEffect;
use super::BirLowerer;
use crate::error::{BirGenError, BirGenErrorKind};
use crate::scope::LoopContext;
use crate::{BirOperand, BlockId, FieldAccessKind, NonTerminatorKind, TerminatorKind, VarKind};
use bir_ast::expr::{Expr, ExprKind};
use bir_ast::stmt::{Block, Stmt, StmtKind, VarDef};
use bir_ast::{SemType, Span};

impl<'a> BirLowerer<'a> {
    pub(super) fn lower_stmt(
        &mut self,
        bb: BlockId,
        stmt: &Stmt,
    ) -> Result<Option<BlockId>, BirGenError> {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                // The value is dropped; calls still continue in their post-call block.
                let effect = self.lower_expr(bb, e)?;
                Ok(Some(effect.block))
            }

            StmtKind::Block(block) => self.lower_block(bb, block),

            StmtKind::If {
                cond,
                then_body,
                else_stmt,
            } => self.lower_if(bb, cond, then_body, else_stmt.as_deref(), stmt.span),

            StmtKind::While { cond, body } => self.lower_while(bb, cond, body, stmt.span),

            StmtKind::Return(value) => {
                let end = match value {
                    Some(e) => {
                        let effect = self.lower_expr(bb, e)?;
                        self.move_to_return_slot(effect.block, effect.result, stmt.span)?;
                        effect.block
                    }
                    None => bb,
                };
                self.builder
                    .terminate(end, None, TerminatorKind::Return, stmt.span)?;
                Ok(None)
            }

            StmtKind::Break => {
                let target = self.loop_target("break", stmt.span, |l| l.on_break)?;
                self.goto(bb, target, stmt.span)?;
                Ok(None)
            }

            StmtKind::Continue => {
                let target = self.loop_target("continue", stmt.span, |l| l.on_continue)?;
                self.goto(bb, target, stmt.span)?;
                Ok(None)
            }

            StmtKind::VarDef(var) => self.lower_var_def(bb, var, stmt.span),

            StmtKind::Assign { target, value } => {
                let effect = self.lower_expr(bb, value)?;
                self.assign_to(target, effect, stmt.span)
            }

            StmtKind::CompoundAssign {
                op,
                target,
                value,
                ty,
            } => {
                // `x op= v` reads the target, combines, then stores back.
                let effect = self.lower_binary(bb, *op, target, value, ty.clone(), stmt.span)?;
                self.assign_to(target, effect, stmt.span)
            }

            StmtKind::Panic(error) => {
                let effect = self.lower_expr(bb, error)?;
                self.builder.terminate(
                    effect.block,
                    None,
                    TerminatorKind::Panic {
                        error: effect.result,
                    },
                    stmt.span,
                )?;
                Ok(None)
            }

            StmtKind::Lock(body) => self.lower_lock(bb, body, stmt.span),

            StmtKind::Foreach { .. } => Err(BirGenError::unsupported_statement(
                stmt.kind.describe(),
                stmt.span,
            )),
        }
    }

    /// Lower statements in order, stopping once control leaves.
    pub(super) fn lower_stmts(
        &mut self,
        bb: BlockId,
        stmts: &[Stmt],
    ) -> Result<Option<BlockId>, BirGenError> {
        let mut current = bb;
        for stmt in stmts {
            match self.lower_stmt(current, stmt)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// A braced block opens a child scope.
    fn lower_block(&mut self, bb: BlockId, block: &Block) -> Result<Option<BlockId>, BirGenError> {
        self.builder.scopes().enter();
        let result = self.lower_stmts(bb, &block.stmts);
        self.builder.scopes().exit();
        result
    }

    fn lower_if(
        &mut self,
        bb: BlockId,
        cond: &Expr,
        then_body: &Block,
        else_stmt: Option<&Stmt>,
        span: Span,
    ) -> Result<Option<BlockId>, BirGenError> {
        let cond = self.lower_expr(bb, cond)?;
        let then_bb = self.builder.add_block();
        let then_end = self.lower_block(then_bb, then_body)?;

        let merge = match else_stmt {
            Some(else_stmt) => {
                let else_bb = self.builder.add_block();
                self.branch(cond, then_bb, else_bb, span)?;
                let else_end = self.lower_stmt(else_bb, else_stmt)?;
                let merge = self.builder.add_block();
                if let Some(end) = else_end {
                    self.goto(end, merge, span)?;
                }
                merge
            }
            None => {
                let merge = self.builder.add_block();
                self.branch(cond, then_bb, merge, span)?;
                merge
            }
        };

        if let Some(end) = then_end {
            self.goto(end, merge, span)?;
        }
        Ok(Some(merge))
    }

    fn lower_while(
        &mut self,
        bb: BlockId,
        cond: &Expr,
        body: &Block,
        span: Span,
    ) -> Result<Option<BlockId>, BirGenError> {
        let head = self.builder.add_block();
        self.goto(bb, head, span)?;
        let cond = self.lower_expr(head, cond)?;

        let body_bb = self.builder.add_block();
        let exit = self.builder.add_block();
        self.branch(cond, body_bb, exit, span)?;

        self.builder.loops().push_loop(exit, head);
        let body_end = self.lower_block(body_bb, body)?;
        if let Some(end) = body_end {
            self.goto(end, head, span)?;
        }
        self.builder.loops().pop_loop()?;

        Ok(Some(exit))
    }

    /// `lock { .. }`: enter through a lock terminator, leave through unlock.
    fn lower_lock(
        &mut self,
        bb: BlockId,
        body: &Block,
        span: Span,
    ) -> Result<Option<BlockId>, BirGenError> {
        let locked = self.builder.add_block();
        self.builder
            .terminate(bb, None, TerminatorKind::Lock { locked_bb: locked }, span)?;
        match self.lower_block(locked, body)? {
            Some(end) => {
                let after = self.builder.add_block();
                self.builder
                    .terminate(end, None, TerminatorKind::Unlock { unlock_bb: after }, span)?;
                Ok(Some(after))
            }
            // TODO: emit an unlock before a return or break leaves the locked region.
            None => Ok(None),
        }
    }

    fn lower_var_def(
        &mut self,
        bb: BlockId,
        var: &VarDef,
        span: Span,
    ) -> Result<Option<BlockId>, BirGenError> {
        let key = self.unit.ctx.ref_symbol(var.symbol);
        let name = var.name.value.clone();
        match &var.init {
            None => {
                self.builder
                    .locals()
                    .allocate_bound(name, var.ty.clone(), VarKind::Local, key);
                Ok(Some(bb))
            }
            Some(init) => {
                let value = self.lower_expr(bb, init)?;
                let local =
                    self.builder
                        .locals()
                        .allocate_bound(name, var.ty.clone(), VarKind::Local, key);
                self.builder.emit(
                    value.block,
                    local,
                    NonTerminatorKind::Move { rhs: value.result },
                    span,
                )?;
                Ok(Some(value.block))
            }
        }
    }

    /// Store an already lowered value into an assignment target.
    fn assign_to(
        &mut self,
        target: &Expr,
        value: ExprEffect,
        span: Span,
    ) -> Result<Option<BlockId>, BirGenError> {
        match &target.kind {
            ExprKind::VarRef { name, symbol } => {
                let key = self.unit.ctx.ref_symbol(*symbol);
                let local = self
                    .builder
                    .locals()
                    .lookup(key)
                    .ok_or_else(|| BirGenError::unresolved_variable(name.value.clone(), name.span))?;
                self.builder.emit(
                    value.block,
                    local,
                    NonTerminatorKind::Move { rhs: value.result },
                    span,
                )?;
                Ok(Some(value.block))
            }

            ExprKind::IndexAccess { container, index } => {
                let base = self.lower_expr(value.block, container)?;
                let key = self.lower_expr(base.block, index)?;
                let access = if container.ty == Some(SemType::Map) {
                    FieldAccessKind::MapStore
                } else {
                    FieldAccessKind::ArrayStore
                };
                self.builder.emit(
                    key.block,
                    base.result,
                    NonTerminatorKind::FieldAccess {
                        access,
                        key: key.result,
                        rhs: value.result,
                    },
                    span,
                )?;
                Ok(Some(key.block))
            }

            ExprKind::FieldAccess { expr, field } => {
                let base = self.lower_expr(value.block, expr)?;
                let key = self.load_field_name(base.block, &field.value, field.span)?;
                self.builder.emit(
                    base.block,
                    base.result,
                    NonTerminatorKind::FieldAccess {
                        access: FieldAccessKind::MapStore,
                        key,
                        rhs: value.result,
                    },
                    span,
                )?;
                Ok(Some(base.block))
            }

            ExprKind::WildcardBindingPattern => {
                let sink = self.builder.locals().allocate_temporary(None);
                self.builder.emit(
                    value.block,
                    sink,
                    NonTerminatorKind::Move { rhs: value.result },
                    span,
                )?;
                Ok(Some(value.block))
            }

            other => Err(BirGenError::unsupported_target(other.describe(), target.span)),
        }
    }

    pub(super) fn move_to_return_slot(
        &mut self,
        bb: BlockId,
        value: BirOperand,
        span: Span,
    ) -> Result<(), BirGenError> {
        let slot = self.return_slot;
        self.builder
            .emit(bb, slot, NonTerminatorKind::Move { rhs: value }, span)
    }

    pub(super) fn goto(&mut self, from: BlockId, to: BlockId, span: Span) -> Result<(), BirGenError> {
        self.builder
            .terminate(from, None, TerminatorKind::Goto { target: to }, span)
    }

    pub(super) fn branch(
        &mut self,
        cond: ExprEffect,
        true_bb: BlockId,
        false_bb: BlockId,
        span: Span,
    ) -> Result<(), BirGenError> {
        self.builder.terminate(
            cond.block,
            None,
            TerminatorKind::Branch {
                op: cond.result,
                true_bb,
                false_bb,
            },
            span,
        )
    }

    fn loop_target(
        &mut self,
        statement: &'static str,
        span: Span,
        pick: impl Fn(&LoopContext) -> BlockId,
    ) -> Result<BlockId, BirGenError> {
        self.builder
            .loops()
            .current()
            .map(pick)
            .ok_or_else(|| BirGenError::new(BirGenErrorKind::NoEnclosingLoop { statement }, span))
    }
}
