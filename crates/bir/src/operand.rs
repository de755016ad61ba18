// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Operands and constant values.

use crate::LocalId;
use bir_ast::expr::Literal;
use std::fmt;

/// A virtual register: a reference to one slot of the function's local
/// table. Copies of an operand refer to the same storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BirOperand {
    pub local: LocalId,
}

impl BirOperand {
    pub fn new(local: LocalId) -> Self {
        Self { local }
    }

    /// Position of the referenced declaration in the local table.
    pub fn index(self) -> usize {
        self.local.0 as usize
    }
}

/// Compile-time value carried by constant loads and package constants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Nil,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Decimal(String),
    String(String),
}

impl From<&Literal> for ConstValue {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Nil => ConstValue::Nil,
            Literal::Boolean(b) => ConstValue::Boolean(*b),
            Literal::Int(v) => ConstValue::Int(*v),
            Literal::Float(v) => ConstValue::Float(*v),
            Literal::Decimal(s) => ConstValue::Decimal(s.clone()),
            Literal::String(s) => ConstValue::String(s.clone()),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Nil => write!(f, "()"),
            ConstValue::Boolean(b) => write!(f, "{}", b),
            ConstValue::Int(v) => write!(f, "{}", v),
            ConstValue::Float(v) => write!(f, "{:?}", v),
            ConstValue::Decimal(s) => write!(f, "{}d", s),
            ConstValue::String(s) => write!(f, "{:?}", s),
        }
    }
}
