// src/package/spec.rs

//! Package specs

use super::deps::{PackageDepsEdit, PackageDepsSpec};

/// A named package and the packages it depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    name: String,
    deps: PackageDepsSpec,
}

impl PackageSpec {
    /// A package without dependencies
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            deps: PackageDepsSpec::new(),
        }
    }

    pub fn builder(name: impl Into<String>) -> PackageSpecBuilder {
        PackageSpecBuilder {
            name: name.into(),
            deps: PackageDepsSpec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deps(&self) -> &PackageDepsSpec {
        &self.deps
    }
}

/// Accumulates the dependencies of a [`PackageSpec`]
#[derive(Debug, Clone)]
pub struct PackageSpecBuilder {
    name: String,
    deps: PackageDepsSpec,
}

impl PackageSpecBuilder {
    pub fn build(self) -> PackageSpec {
        PackageSpec {
            name: self.name,
            deps: self.deps,
        }
    }
}

impl PackageDepsEdit for PackageSpecBuilder {
    fn package_deps_mut(&mut self) -> &mut PackageDepsSpec {
        &mut self.deps
    }
}
