// src/fp/config.rs

//! A single feature-pack dependency and its customizations

use crate::config::{ConfigCustomizations, ConfigCustomizationsEdit};
use crate::error::{Error, Result};
use crate::location::{FeaturePackLocation, Fpid};
use crate::selection::Selection;

/// One dependency edge from a consumer to a feature-pack
///
/// Besides config customizations it carries the package selection, the
/// patches to apply and whether the dependency is transitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePackConfig {
    location: FeaturePackLocation,
    transitive: bool,
    inherit_packages: Option<bool>,
    packages: Selection<String>,
    patches: Vec<Fpid>,
    allowed_family: bool,
    configs: ConfigCustomizations,
}

impl FeaturePackConfig {
    pub fn builder(location: FeaturePackLocation) -> FeaturePackConfigBuilder {
        Self::new_builder(location, false)
    }

    pub fn transitive_builder(location: FeaturePackLocation) -> FeaturePackConfigBuilder {
        Self::new_builder(location, true)
    }

    fn new_builder(location: FeaturePackLocation, transitive: bool) -> FeaturePackConfigBuilder {
        FeaturePackConfigBuilder {
            config: FeaturePackConfig {
                location,
                transitive,
                inherit_packages: None,
                packages: Selection::new(),
                patches: Vec::new(),
                allowed_family: false,
                configs: ConfigCustomizations::new(),
            },
        }
    }

    /// A builder seeded with this dependency, pointing at `location`
    pub fn builder_from(config: &FeaturePackConfig, location: FeaturePackLocation) -> FeaturePackConfigBuilder {
        FeaturePackConfigBuilder {
            config: FeaturePackConfig {
                location,
                ..config.clone()
            },
        }
    }

    pub fn location(&self) -> &FeaturePackLocation {
        &self.location
    }

    pub fn is_transitive(&self) -> bool {
        self.transitive
    }

    /// Explicit inherit-packages setting, if any
    pub fn inherit_packages(&self) -> Option<bool> {
        self.inherit_packages
    }

    pub fn is_inherit_packages(&self, default: bool) -> bool {
        self.inherit_packages.unwrap_or(default)
    }

    pub fn included_packages(&self) -> impl Iterator<Item = &String> {
        self.packages.included().keys()
    }

    pub fn excluded_packages(&self) -> impl Iterator<Item = &String> {
        self.packages.excluded().keys()
    }

    pub fn is_package_included(&self, name: &str) -> bool {
        self.packages.is_included(name)
    }

    pub fn is_package_excluded(&self, name: &str) -> bool {
        self.packages.is_excluded(name)
    }

    pub fn patches(&self) -> &[Fpid] {
        &self.patches
    }

    pub fn has_patch(&self, patch: &Fpid) -> bool {
        self.patches.contains(patch)
    }

    /// Marks a dependency that may be satisfied by another member of the
    /// feature-pack's family
    pub fn is_allowed_family(&self) -> bool {
        self.allowed_family
    }

    pub fn configs(&self) -> &ConfigCustomizations {
        &self.configs
    }

    /// True when the dependency carries more than its location
    pub fn has_customizations(&self) -> bool {
        self.inherit_packages.is_some()
            || !self.packages.is_empty()
            || !self.patches.is_empty()
            || self.allowed_family
            || !self.configs.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FeaturePackConfigBuilder {
    config: FeaturePackConfig,
}

impl FeaturePackConfigBuilder {
    pub fn set_inherit_packages(&mut self, inherit: bool) -> &mut Self {
        self.config.inherit_packages = Some(inherit);
        self
    }

    pub fn include_package(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.config
            .packages
            .include(name.clone(), ())
            .map_err(|c| c.describe("Package", &name))?;
        Ok(self)
    }

    pub fn exclude_package(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.config
            .packages
            .exclude(name.clone(), ())
            .map_err(|c| c.describe("Package", &name))?;
        Ok(self)
    }

    pub fn remove_included_package(&mut self, name: &str) -> Result<&mut Self> {
        self.config
            .packages
            .remove_included(name)
            .ok_or_else(|| Error::description(format!("Package {} is not included", name)))?;
        Ok(self)
    }

    pub fn remove_excluded_package(&mut self, name: &str) -> Result<&mut Self> {
        self.config
            .packages
            .remove_excluded(name)
            .ok_or_else(|| Error::description(format!("Package {} is not excluded", name)))?;
        Ok(self)
    }

    pub fn add_patch(&mut self, patch: Fpid) -> Result<&mut Self> {
        if self.config.patches.contains(&patch) {
            return Err(Error::description(format!(
                "Patch {} has already been added to {}",
                patch, self.config.location
            )));
        }
        self.config.patches.push(patch);
        Ok(self)
    }

    pub fn remove_patch(&mut self, patch: &Fpid) -> Result<&mut Self> {
        let index = self
            .config
            .patches
            .iter()
            .position(|p| p == patch)
            .ok_or_else(|| {
                Error::description(format!(
                    "Patch {} has not been added to {}",
                    patch, self.config.location
                ))
            })?;
        self.config.patches.remove(index);
        Ok(self)
    }

    pub fn set_allowed_family(&mut self, allowed: bool) -> &mut Self {
        self.config.allowed_family = allowed;
        self
    }

    pub fn location(&self) -> &FeaturePackLocation {
        &self.config.location
    }

    pub fn build(self) -> FeaturePackConfig {
        self.config
    }
}

impl ConfigCustomizationsEdit for FeaturePackConfigBuilder {
    fn customizations_mut(&mut self) -> &mut ConfigCustomizations {
        &mut self.config.configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigId;

    fn location() -> FeaturePackLocation {
        "server@universe(repo):1.x#1.0.0".parse().unwrap()
    }

    #[test]
    fn test_package_include_exclude_conflict() {
        let mut builder = FeaturePackConfig::builder(location());
        builder.include_package("docs").unwrap();
        let err = builder.exclude_package("docs").unwrap_err();
        assert!(err.is_description());
        assert!(err.to_string().contains("docs"));

        builder.exclude_package("logging").unwrap();
        assert!(builder.include_package("logging").is_err());
        builder.remove_excluded_package("logging").unwrap();
        assert!(builder.remove_excluded_package("logging").is_err());
        builder.include_package("logging").unwrap();

        let config = builder.build();
        let included: Vec<_> = config.included_packages().collect();
        assert_eq!(included, vec!["docs", "logging"]);
    }

    #[test]
    fn test_patches_are_unique() {
        let patch = Fpid::parse("server-patch@universe(repo):1.x#1.0.1").unwrap();
        let mut builder = FeaturePackConfig::builder(location());
        builder.add_patch(patch.clone()).unwrap();
        assert!(builder.add_patch(patch.clone()).unwrap_err().is_description());
        builder.remove_patch(&patch).unwrap();
        assert!(builder.remove_patch(&patch).is_err());
        assert!(builder.build().patches().is_empty());
    }

    #[test]
    fn test_customizations() {
        let mut builder = FeaturePackConfig::transitive_builder(location());
        builder
            .set_allowed_family(true)
            .set_inherit_configs(false)
            .include_default_config(ConfigId::named("standalone", "standalone.xml"))
            .unwrap();
        let config = builder.build();
        assert!(config.is_transitive());
        assert!(config.is_allowed_family());
        assert!(config.has_customizations());
        assert_eq!(config.configs().inherit_configs(), Some(false));
        assert!(!FeaturePackConfig::builder(location()).build().has_customizations());
    }
}
