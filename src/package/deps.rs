// src/package/deps.rs

//! Package dependency declarations

use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Classification of a package dependency
///
/// The discriminants are bit patterns: passive carries the optional bit, so
/// anything that treats a dependency as optional treats passive ones the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PackageDepType {
    Optional = 1,
    Passive = 3,
    Required = 4,
}

impl PackageDepType {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Map raw bits back to a classification
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::Optional),
            3 => Some(Self::Passive),
            4 => Some(Self::Required),
            _ => None,
        }
    }

    /// True for both optional and passive dependencies
    pub const fn is_optional(self) -> bool {
        self.bits() & Self::Optional.bits() != 0
    }

    pub const fn is_passive(self) -> bool {
        self.bits() == Self::Passive.bits()
    }

    pub const fn is_required(self) -> bool {
        self.bits() == Self::Required.bits()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::Passive => "passive",
            Self::Required => "required",
        }
    }
}

impl fmt::Display for PackageDepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageDepType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "optional" => Ok(Self::Optional),
            "passive" => Ok(Self::Passive),
            "required" => Ok(Self::Required),
            other => Err(Error::description(format!(
                "Unknown package dependency type: {}",
                other
            ))),
        }
    }
}

/// A dependency on a single package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDependencySpec {
    name: String,
    dep_type: PackageDepType,
}

impl PackageDependencySpec {
    pub fn new(name: impl Into<String>, dep_type: PackageDepType) -> Self {
        Self {
            name: name.into(),
            dep_type,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, PackageDepType::Required)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, PackageDepType::Optional)
    }

    pub fn passive(name: impl Into<String>) -> Self {
        Self::new(name, PackageDepType::Passive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dep_type(&self) -> PackageDepType {
        self.dep_type
    }

    pub fn is_optional(&self) -> bool {
        self.dep_type.is_optional()
    }

    pub fn is_passive(&self) -> bool {
        self.dep_type.is_passive()
    }

    pub fn is_required(&self) -> bool {
        self.dep_type.is_required()
    }
}

impl fmt::Display for PackageDependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.dep_type)
    }
}

/// Local and external package dependencies of a package or feature spec
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDepsSpec {
    local: IndexMap<String, PackageDependencySpec>,
    external: IndexMap<String, IndexMap<String, PackageDependencySpec>>,
    required: usize,
}

impl PackageDepsSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local dependencies in declaration order
    pub fn local_deps(&self) -> impl Iterator<Item = &PackageDependencySpec> {
        self.local.values()
    }

    pub fn local_dep(&self, name: &str) -> Option<&PackageDependencySpec> {
        self.local.get(name)
    }

    /// Origins this spec has external dependencies on
    pub fn external_origins(&self) -> impl Iterator<Item = &str> {
        self.external.keys().map(String::as_str)
    }

    /// External dependencies on the feature-pack known under `origin`
    pub fn external_deps(&self, origin: &str) -> impl Iterator<Item = &PackageDependencySpec> {
        self.external.get(origin).into_iter().flat_map(|deps| deps.values())
    }

    pub fn external_dep(&self, origin: &str, name: &str) -> Option<&PackageDependencySpec> {
        self.external.get(origin).and_then(|deps| deps.get(name))
    }

    pub fn has_local_deps(&self) -> bool {
        !self.local.is_empty()
    }

    pub fn has_external_deps(&self) -> bool {
        !self.external.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.external.is_empty()
    }

    /// Number of required dependencies, local and external
    ///
    /// A spec with no required dependencies can be installed purely
    /// additively.
    pub fn required_count(&self) -> usize {
        self.required
    }

    fn track(&mut self, previous: Option<PackageDependencySpec>, current: PackageDepType) {
        if previous.is_some_and(|p| p.is_required()) {
            self.required -= 1;
        }
        if current.is_required() {
            self.required += 1;
        }
    }

    pub(crate) fn insert_local(&mut self, dep: PackageDependencySpec) {
        let dep_type = dep.dep_type;
        let previous = self.local.insert(dep.name.clone(), dep);
        self.track(previous, dep_type);
    }

    pub(crate) fn insert_external(&mut self, origin: String, dep: PackageDependencySpec) {
        let dep_type = dep.dep_type;
        let previous = self
            .external
            .entry(origin)
            .or_default()
            .insert(dep.name.clone(), dep);
        self.track(previous, dep_type);
    }
}

/// Builders that accumulate package dependencies
///
/// A later declaration for the same package replaces the earlier one in
/// place.
pub trait PackageDepsEdit {
    fn package_deps_mut(&mut self) -> &mut PackageDepsSpec;

    /// Depend on a package of the same feature-pack
    fn add_package_dep(&mut self, name: impl Into<String>, dep_type: PackageDepType) -> &mut Self
    where
        Self: Sized,
    {
        self.package_deps_mut()
            .insert_local(PackageDependencySpec::new(name, dep_type));
        self
    }

    /// Depend on a package of the feature-pack known under `origin`
    fn add_external_package_dep(
        &mut self,
        origin: impl Into<String>,
        name: impl Into<String>,
        dep_type: PackageDepType,
    ) -> &mut Self
    where
        Self: Sized,
    {
        self.package_deps_mut()
            .insert_external(origin.into(), PackageDependencySpec::new(name, dep_type));
        self
    }
}

impl PackageDepsEdit for PackageDepsSpec {
    fn package_deps_mut(&mut self) -> &mut PackageDepsSpec {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_bits() {
        assert!(PackageDepType::Optional.is_optional());
        assert!(PackageDepType::Passive.is_optional());
        assert!(!PackageDepType::Required.is_optional());
        assert_eq!(
            PackageDepType::Passive.bits() & PackageDepType::Optional.bits(),
            PackageDepType::Optional.bits()
        );
        assert_eq!(PackageDepType::Optional.bits(), 1);
        assert_eq!(PackageDepType::Passive.bits(), 3);
        assert_eq!(PackageDepType::Required.bits(), 4);
    }

    #[test]
    fn test_from_bits() {
        assert_eq!(PackageDepType::from_bits(3), Some(PackageDepType::Passive));
        assert_eq!(PackageDepType::from_bits(2), None);
    }

    #[test]
    fn test_parse_dep_type() {
        assert_eq!("passive".parse::<PackageDepType>().unwrap(), PackageDepType::Passive);
        assert!("sometimes".parse::<PackageDepType>().unwrap_err().is_description());
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut deps = PackageDepsSpec::new();
        deps.add_package_dep("a", PackageDepType::Required)
            .add_package_dep("b", PackageDepType::Optional)
            .add_package_dep("a", PackageDepType::Passive);

        let names: Vec<&str> = deps.local_deps().map(|d| d.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(deps.local_dep("a").unwrap().is_passive());
        assert_eq!(deps.required_count(), 0);
    }

    #[test]
    fn test_external_deps_by_origin() {
        let mut deps = PackageDepsSpec::new();
        deps.add_external_package_dep("core", "logging", PackageDepType::Required)
            .add_external_package_dep("core", "docs", PackageDepType::Optional)
            .add_external_package_dep("web", "servlet", PackageDepType::Required);

        let origins: Vec<&str> = deps.external_origins().collect();
        assert_eq!(origins, vec!["core", "web"]);
        assert_eq!(deps.external_deps("core").count(), 2);
        assert_eq!(deps.external_deps("missing").count(), 0);
        assert!(deps.external_dep("web", "servlet").unwrap().is_required());
        assert_eq!(deps.required_count(), 2);
    }
}
