// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Package identities.

use std::fmt;

/// Organization used when an import or package names none.
pub const ANON_ORG: &str = "$anon";
/// Package name used when an import names no components.
pub const DEFAULT_PACKAGE: &str = ".";
/// Version used when an import names none.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Identity of a compiled or imported package.
///
/// `pkg_name` is the dot-joined form of `name_comps` and is what lookup keys
/// are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageId {
    pub org_name: String,
    pub name_comps: Vec<String>,
    pub pkg_name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(org_name: impl Into<String>, name_comps: Vec<String>, version: impl Into<String>) -> Self {
        let pkg_name = name_comps.join(".");
        Self {
            org_name: org_name.into(),
            name_comps,
            pkg_name,
            version: version.into(),
        }
    }

    /// The anonymous package a single source file compiles into.
    pub fn anonymous() -> Self {
        Self::new(ANON_ORG, vec![DEFAULT_PACKAGE.to_string()], DEFAULT_VERSION)
    }

    pub fn is_unnamed(&self) -> bool {
        self.org_name == ANON_ORG && self.pkg_name == DEFAULT_PACKAGE
    }

    /// `<org>/<pkg-name>`, the prefix of every function lookup key in this package.
    pub fn module_key(&self) -> String {
        format!("{}/{}", self.org_name, self.pkg_name)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unnamed() {
            return write!(f, "$anon-package");
        }
        write!(f, "{}/{} v {}", self.org_name, self.pkg_name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_components_are_dot_joined() {
        let id = PackageId::new("ballerina", vec!["lang".into(), "array".into()], "1.0.0");
        assert_eq!(id.pkg_name, "lang.array");
        assert_eq!(id.module_key(), "ballerina/lang.array");
        assert_eq!(id.to_string(), "ballerina/lang.array v 1.0.0");
    }

    #[test]
    fn anonymous_package() {
        let id = PackageId::anonymous();
        assert!(id.is_unnamed());
        assert_eq!(id.module_key(), "$anon/.");
        assert_eq!(id.to_string(), "$anon-package");
    }
}
