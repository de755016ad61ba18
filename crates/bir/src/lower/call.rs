// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Callee resolution for invocations.

use super::BirLowerer;
use crate::error::BirGenError;
use crate::CalleeRef;
use bir_ast::{Ident, PackageId};
use std::collections::HashMap;
use std::sync::Arc;

/// Import alias -> package identity, built once per package.
pub type ImportAliasMap = HashMap<String, Arc<PackageId>>;

/// `<org>/<pkg-name>:<function>`
pub fn function_lookup_key(package: &PackageId, function: &str) -> String {
    format!("{}:{}", package.module_key(), function)
}

/// Package a call lives in: the aliased import if qualified, otherwise the
/// package being compiled. An empty alias counts as no alias.
pub fn resolve_callee_package(
    aliases: &ImportAliasMap,
    current: &Arc<PackageId>,
    alias: Option<&Ident>,
) -> Result<Arc<PackageId>, BirGenError> {
    match alias.filter(|a| !a.value.is_empty()) {
        Some(alias) => aliases
            .get(&alias.value)
            .cloned()
            .ok_or_else(|| BirGenError::unresolved_import(alias.value.clone(), alias.span)),
        None => Ok(Arc::clone(current)),
    }
}

impl<'a> BirLowerer<'a> {
    pub(super) fn resolve_callee(
        &self,
        alias: Option<&Ident>,
        name: &Ident,
    ) -> Result<CalleeRef, BirGenError> {
        let package =
            resolve_callee_package(&self.unit.import_aliases, &self.unit.package_id, alias)?;
        Ok(CalleeRef {
            name: name.value.clone(),
            lookup_key: function_lookup_key(&package, &name.value),
            package,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use bir_ast::Span;

    fn ident(s: &str) -> Ident {
        Ident::new(s, Span::default())
    }

    #[test]
    fn unqualified_calls_stay_in_current_package() {
        let current = Arc::new(PackageId::new("acme", vec!["app".into()], "1.0.0"));
        let pkg = resolve_callee_package(&ImportAliasMap::new(), &current, None).unwrap();
        assert!(Arc::ptr_eq(&pkg, &current));
        assert_eq!(function_lookup_key(&pkg, "f"), "acme/app:f");
    }

    #[test]
    fn aliased_calls_use_import() {
        let current = Arc::new(PackageId::anonymous());
        let io = Arc::new(PackageId::new("ballerina", vec!["io".into()], "0.0.0"));
        let mut aliases = ImportAliasMap::new();
        aliases.insert("io".into(), Arc::clone(&io));
        let pkg = resolve_callee_package(&aliases, &current, Some(&ident("io"))).unwrap();
        assert_eq!(function_lookup_key(&pkg, "println"), "ballerina/io:println");

        let empty = resolve_callee_package(&aliases, &current, Some(&ident(""))).unwrap();
        assert!(Arc::ptr_eq(&empty, &current));
    }

    #[test]
    fn unknown_alias_is_unresolved_import() {
        let current = Arc::new(PackageId::anonymous());
        let err = resolve_callee_package(&ImportAliasMap::new(), &current, Some(&ident("log")))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnresolvedReference);
        assert_eq!(err.to_string(), "unresolved import alias `log`");
    }

    #[test]
    fn multi_component_names_are_dot_joined() {
        let pkg = PackageId::new("ballerina", vec!["lang".into(), "int".into()], "1.0.0");
        assert_eq!(function_lookup_key(&pkg, "abs"), "ballerina/lang.int:abs");
    }
}
