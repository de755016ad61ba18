// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Semantic types as determined by type resolution.

use std::fmt;

/// The determined type of an expression, variable, or constant.
///
/// Only the shapes lowering needs to name are distinguished; everything else
/// arrives as `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SemType {
    Nil,
    Boolean,
    Int,
    Float,
    Decimal,
    String,
    Error,
    Any,
    /// Any list, regardless of member type.
    List,
    /// Any mapping.
    Map,
    /// A list whose members all have the given type (`int[]`).
    Array(Box<SemType>),
    Named(String),
}

impl SemType {
    pub fn array_of(elem: SemType) -> Self {
        SemType::Array(Box::new(elem))
    }
}

impl fmt::Display for SemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemType::Nil => write!(f, "()"),
            SemType::Boolean => write!(f, "boolean"),
            SemType::Int => write!(f, "int"),
            SemType::Float => write!(f, "float"),
            SemType::Decimal => write!(f, "decimal"),
            SemType::String => write!(f, "string"),
            SemType::Error => write!(f, "error"),
            SemType::Any => write!(f, "any"),
            SemType::List => write!(f, "list"),
            SemType::Map => write!(f, "map"),
            SemType::Array(elem) => write!(f, "{}[]", elem),
            SemType::Named(name) => write!(f, "{}", name),
        }
    }
}
