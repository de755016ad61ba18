// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compilation-wide identity service.
//!
//! Owns the symbol spaces handed out during resolution and the interned
//! package identities. Lowering only reads symbols through [`CompilerContext::ref_symbol`]
//! and mints package identities for imports.

use bir_ast::package_id::{ANON_ORG, DEFAULT_PACKAGE, DEFAULT_VERSION};
use bir_ast::{PackageId, SymbolRef};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("unknown symbol space {0}")]
    UnknownSymbolSpace(u32),

    #[error("unknown symbol {0}")]
    UnknownSymbol(SymbolRef),
}

#[derive(Debug)]
struct SymbolSpace {
    names: Vec<String>,
}

/// Shared state for one compiler invocation.
#[derive(Debug)]
pub struct CompilerContext {
    packages: HashMap<PackageId, Arc<PackageId>>,
    spaces: Vec<SymbolSpace>,
    /// Narrowed symbol -> the symbol it narrows. Always points at a root.
    narrowed: HashMap<SymbolRef, SymbolRef>,
    default_package: Arc<PackageId>,
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerContext {
    pub fn new() -> Self {
        let default_package = Arc::new(PackageId::anonymous());
        let mut packages = HashMap::new();
        packages.insert((*default_package).clone(), Arc::clone(&default_package));
        Self {
            packages,
            spaces: Vec::new(),
            narrowed: HashMap::new(),
            default_package,
        }
    }

    /// The anonymous package single files compile into.
    pub fn default_package(&self) -> Arc<PackageId> {
        Arc::clone(&self.default_package)
    }

    /// Mint a package identity, filling absent parts with the anonymous
    /// organization, the default package name and the default version.
    ///
    /// Identical identities share one allocation.
    pub fn new_package_id(
        &mut self,
        org: Option<&str>,
        name_comps: &[&str],
        version: Option<&str>,
    ) -> Arc<PackageId> {
        let comps = if name_comps.is_empty() {
            vec![DEFAULT_PACKAGE.to_string()]
        } else {
            name_comps.iter().map(|c| c.to_string()).collect()
        };
        let id = PackageId::new(
            org.unwrap_or(ANON_ORG),
            comps,
            version.unwrap_or(DEFAULT_VERSION),
        );
        self.intern_package_id(id)
    }

    pub fn intern_package_id(&mut self, id: PackageId) -> Arc<PackageId> {
        if let Some(existing) = self.packages.get(&id) {
            return Arc::clone(existing);
        }
        tracing::trace!(package = %id, "interned package identity");
        let interned = Arc::new(id.clone());
        self.packages.insert(id, Arc::clone(&interned));
        interned
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Open a fresh, empty symbol space.
    pub fn new_symbol_space(&mut self) -> u32 {
        let id = self.spaces.len() as u32;
        self.spaces.push(SymbolSpace { names: Vec::new() });
        id
    }

    pub fn define_symbol(&mut self, space: u32, name: &str) -> Result<SymbolRef, ContextError> {
        let sp = self
            .spaces
            .get_mut(space as usize)
            .ok_or(ContextError::UnknownSymbolSpace(space))?;
        let index = sp.names.len() as u32;
        sp.names.push(name.to_string());
        Ok(SymbolRef::new(space, index))
    }

    pub fn symbol_name(&self, symbol: SymbolRef) -> Option<&str> {
        self.spaces
            .get(symbol.space as usize)?
            .names
            .get(symbol.index as usize)
            .map(String::as_str)
    }

    /// Define a symbol standing for `base` under a narrower type, as type
    /// guards do. It shares `base`'s name and space.
    pub fn create_narrowed_symbol(&mut self, base: SymbolRef) -> Result<SymbolRef, ContextError> {
        let name = self
            .symbol_name(base)
            .ok_or(ContextError::UnknownSymbol(base))?
            .to_string();
        let root = self.unnarrowed(base);
        let narrowed = self.define_symbol(base.space, &name)?;
        self.narrowed.insert(narrowed, root);
        Ok(narrowed)
    }

    /// The symbol a narrowed symbol was derived from, or `symbol` itself.
    pub fn unnarrowed(&self, symbol: SymbolRef) -> SymbolRef {
        self.narrowed.get(&symbol).copied().unwrap_or(symbol)
    }

    /// Stable key for binding tables. All narrowings of a symbol map to the
    /// same key.
    pub fn ref_symbol(&self, symbol: SymbolRef) -> SymbolRef {
        self.unnarrowed(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_package_ids_are_shared() {
        let mut ctx = CompilerContext::new();
        let a = ctx.new_package_id(Some("ballerina"), &["io"], Some("1.2.0"));
        let b = ctx.new_package_id(Some("ballerina"), &["io"], Some("1.2.0"));
        assert!(Arc::ptr_eq(&a, &b));
        let c = ctx.new_package_id(Some("ballerina"), &["io"], Some("1.3.0"));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn missing_parts_get_defaults() {
        let mut ctx = CompilerContext::new();
        let id = ctx.new_package_id(None, &[], None);
        assert!(Arc::ptr_eq(&id, &ctx.default_package()));
        assert_eq!(ctx.package_count(), 1);
    }

    #[test]
    fn narrowed_symbols_collapse_to_root() {
        let mut ctx = CompilerContext::new();
        let space = ctx.new_symbol_space();
        let x = ctx.define_symbol(space, "x").unwrap();
        let n1 = ctx.create_narrowed_symbol(x).unwrap();
        let n2 = ctx.create_narrowed_symbol(n1).unwrap();
        assert_ne!(n1, x);
        assert_eq!(ctx.symbol_name(n2), Some("x"));
        assert_eq!(ctx.ref_symbol(n1), x);
        assert_eq!(ctx.ref_symbol(n2), x);
        assert_eq!(ctx.ref_symbol(x), x);
    }

    #[test]
    fn unknown_space_is_an_error() {
        let mut ctx = CompilerContext::new();
        assert_eq!(
            ctx.define_symbol(7, "x"),
            Err(ContextError::UnknownSymbolSpace(7))
        );
        let bogus = SymbolRef::new(0, 0);
        assert_eq!(
            ctx.create_narrowed_symbol(bogus),
            Err(ContextError::UnknownSymbol(bogus))
        );
        assert_eq!(ctx.symbol_name(bogus), None);
    }
}
