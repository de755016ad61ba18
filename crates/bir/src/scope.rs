// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Lexical scope tree and loop target stack used while lowering a function.

use crate::error::{BirGenError, BirGenErrorKind};
use crate::{BirScope, BlockId, ScopeId};

/// Break and continue targets of one active loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopContext {
    pub on_break: BlockId,
    pub on_continue: BlockId,
}

/// Innermost loop last.
#[derive(Debug, Default)]
pub struct LoopStack {
    frames: Vec<LoopContext>,
}

impl LoopStack {
    pub fn push_loop(&mut self, on_break: BlockId, on_continue: BlockId) {
        tracing::trace!(?on_break, ?on_continue, depth = self.frames.len() + 1, "push loop");
        self.frames.push(LoopContext {
            on_break,
            on_continue,
        });
    }

    pub fn pop_loop(&mut self) -> Result<LoopContext, BirGenError> {
        let frame = self.frames.pop().ok_or_else(|| {
            BirGenError::invariant(BirGenErrorKind::NoEnclosingLoop {
                statement: "loop exit",
            })
        })?;
        tracing::trace!(depth = self.frames.len(), "pop loop");
        Ok(frame)
    }

    pub fn current(&self) -> Option<&LoopContext> {
        self.frames.last()
    }
}

/// Scopes in creation order. Scope 0 is the function scope.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<BirScope>,
    current: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![BirScope {
                id: ScopeId(0),
                parent: None,
            }],
            current: ScopeId(0),
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Open a child of the current scope and make it current.
    pub fn enter(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(BirScope {
            id,
            parent: Some(self.current),
        });
        self.current = id;
        id
    }

    /// Return to the parent of the current scope. The function scope has no
    /// parent and stays current.
    pub fn exit(&mut self) {
        if let Some(parent) = self
            .scopes
            .get(self.current.0 as usize)
            .and_then(|s| s.parent)
        {
            self.current = parent;
        }
    }

    pub fn into_scopes(self) -> Vec<BirScope> {
        self.scopes
    }
}
