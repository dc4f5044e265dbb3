// src/package/resolve.rs

//! Effective package set of a feature-pack dependency
//!
//! Starting from the feature-pack's default packages (when the consumer
//! inherits them) plus the packages it explicitly included, and without the
//! ones it excluded, the dependency closure is walked:
//!
//! - required dependencies are always pulled; excluding one is an error
//! - optional dependencies are pulled unless excluded
//! - passive dependencies are only remembered; once the main closure is
//!   complete they are activated if all of their own required local
//!   dependencies are installed, repeating until nothing changes
//! - external dependencies are reported per origin and not followed

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::spec::PackageSpec;
use crate::error::{Error, Result};
use crate::fp::FeaturePackConfig;

/// The packages a feature-pack provides, with its default selection
#[derive(Debug, Clone, Default)]
pub struct PackageCatalog {
    packages: IndexMap<String, PackageSpec>,
    defaults: IndexSet<String>,
}

/// Outcome of [`PackageCatalog::resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPackages {
    /// Local packages, dependencies before their dependents
    pub packages: Vec<String>,
    /// Packages needed from other feature-packs, keyed by origin
    pub external: IndexMap<String, Vec<String>>,
}

impl ResolvedPackages {
    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p == name)
    }
}

impl PackageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package, optionally as part of the default selection
    pub fn add_package(&mut self, spec: PackageSpec, default: bool) -> Result<&mut Self> {
        if self.packages.contains_key(spec.name()) {
            return Err(Error::description(format!(
                "Duplicate package {}",
                spec.name()
            )));
        }
        if default {
            self.defaults.insert(spec.name().to_string());
        }
        self.packages.insert(spec.name().to_string(), spec);
        Ok(self)
    }

    pub fn package(&self, name: &str) -> Option<&PackageSpec> {
        self.packages.get(name)
    }

    pub fn default_packages(&self) -> impl Iterator<Item = &str> {
        self.defaults.iter().map(String::as_str)
    }

    /// Compute the packages installed for a feature-pack dependency
    pub fn resolve(&self, config: &FeaturePackConfig) -> Result<ResolvedPackages> {
        let mut walk = Walk {
            catalog: self,
            config,
            visited: IndexSet::new(),
            ordered: Vec::new(),
            passive: IndexSet::new(),
            external: IndexMap::new(),
        };

        if config.is_inherit_packages(true) {
            for name in &self.defaults {
                if config.is_package_excluded(name) {
                    trace!("Default package {} excluded", name);
                    continue;
                }
                walk.visit(name, None)?;
            }
        }
        for name in config.included_packages() {
            walk.visit(name, None)?;
        }

        walk.activate_passive()?;

        debug!(
            "Resolved {} packages for {}",
            walk.ordered.len(),
            config.location()
        );

        Ok(ResolvedPackages {
            packages: walk.ordered,
            external: walk
                .external
                .into_iter()
                .map(|(origin, names)| (origin, names.into_iter().collect()))
                .collect(),
        })
    }
}

struct Walk<'a> {
    catalog: &'a PackageCatalog,
    config: &'a FeaturePackConfig,
    visited: IndexSet<String>,
    ordered: Vec<String>,
    passive: IndexSet<String>,
    external: IndexMap<String, IndexSet<String>>,
}

fn lookup<'a>(
    catalog: &'a PackageCatalog,
    config: &FeaturePackConfig,
    name: &str,
    required_by: Option<&str>,
) -> Result<&'a PackageSpec> {
    catalog.package(name).ok_or_else(|| match required_by {
        Some(parent) => Error::resolution(format!(
            "Package {} required by {} not found in {}",
            name,
            parent,
            config.location()
        )),
        None => Error::resolution(format!(
            "Package {} not found in {}",
            name,
            config.location()
        )),
    })
}

impl Walk<'_> {
    fn visit(&mut self, name: &str, required_by: Option<&str>) -> Result<()> {
        if self.visited.contains(name) {
            return Ok(());
        }
        let spec = lookup(self.catalog, self.config, name, required_by)?;
        self.visited.insert(name.to_string());

        for dep in spec.deps().local_deps() {
            if self.config.is_package_excluded(dep.name()) {
                if dep.is_required() {
                    return Err(Error::resolution(format!(
                        "Package {} required by {} has been excluded",
                        dep.name(),
                        name
                    )));
                }
                trace!("Skipping excluded {} dependency {}", dep.dep_type(), dep.name());
                continue;
            }
            if dep.is_passive() {
                self.passive.insert(dep.name().to_string());
                continue;
            }
            self.visit(dep.name(), Some(name))?;
        }

        for origin in spec.deps().external_origins() {
            let names = self.external.entry(origin.to_string()).or_default();
            for dep in spec.deps().external_deps(origin) {
                names.insert(dep.name().to_string());
            }
        }

        self.ordered.push(name.to_string());
        Ok(())
    }

    fn activate_passive(&mut self) -> Result<()> {
        loop {
            let mut activated = false;
            let candidates: Vec<String> = self.passive.iter().cloned().collect();
            for name in candidates {
                if self.visited.contains(&name) || self.config.is_package_excluded(&name) {
                    continue;
                }
                let spec = lookup(self.catalog, self.config, &name, None)?;
                let satisfied = spec
                    .deps()
                    .local_deps()
                    .filter(|dep| dep.is_required())
                    .all(|dep| self.visited.contains(dep.name()));
                if satisfied {
                    debug!("Activating passive package {}", name);
                    self.visit(&name, None)?;
                    activated = true;
                }
            }
            if !activated {
                return Ok(());
            }
        }
    }
}
