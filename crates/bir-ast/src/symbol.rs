// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolved symbol references.

use std::fmt;

/// Reference to a symbol produced by symbol resolution.
///
/// A symbol lives in a symbol space (one per function or block scope) at a
/// fixed slot. Two references are the same symbol iff both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRef {
    pub space: u32,
    pub index: u32,
}

impl SymbolRef {
    pub fn new(space: u32, index: u32) -> Self {
        Self { space, index }
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym#{}.{}", self.space, self.index)
    }
}
