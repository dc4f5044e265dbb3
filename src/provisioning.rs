// src/provisioning.rs

//! Provisioning configuration root
//!
//! A provisioning config is the feature-pack dependency aggregate of the
//! installation plus a flat map of options. Editing an existing config
//! starts from [`ProvisioningConfig::builder_from`], which replays every
//! dependency and customization into a fresh builder so the result goes
//! through the same validation as the original.

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{ConfigCustomizations, ConfigCustomizationsEdit};
use crate::error::{Error, Result};
use crate::fp::{FeaturePackDepsConfig, FeaturePackDepsEdit};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningConfig {
    deps: FeaturePackDepsConfig,
    options: IndexMap<String, String>,
}

impl ProvisioningConfig {
    pub fn builder() -> ProvisioningConfigBuilder {
        ProvisioningConfigBuilder::default()
    }

    /// A builder holding a replay of `config`
    pub fn builder_from(config: &ProvisioningConfig) -> Result<ProvisioningConfigBuilder> {
        let deps = &config.deps;
        let mut builder = Self::builder();

        builder.set_default_universe(deps.default_universe().cloned());
        for (name, universe) in deps.universes() {
            builder.add_universe(name.clone(), universe.clone())?;
        }
        for dep in deps.feature_pack_deps() {
            let origin = deps.origin_of(&dep.location().producer());
            builder.add_feature_pack_dep(origin, dep.clone())?;
        }
        for dep in deps.transitive_deps() {
            let origin = deps.origin_of(&dep.location().producer());
            builder.add_transitive_dep(origin, dep.clone())?;
        }
        builder.init_configs(deps.configs());
        for (name, value) in &config.options {
            builder.add_option(name.clone(), value.clone());
        }

        debug!(
            "replayed {} direct and {} transitive dependencies",
            deps.feature_pack_deps().count(),
            deps.transitive_deps().count()
        );
        Ok(builder)
    }

    pub fn deps(&self) -> &FeaturePackDepsConfig {
        &self.deps
    }

    pub fn configs(&self) -> &ConfigCustomizations {
        self.deps.configs()
    }

    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProvisioningConfigBuilder {
    config: ProvisioningConfig,
}

impl ProvisioningConfigBuilder {
    /// Set an option; a repeated name replaces the earlier value
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.options.insert(name.into(), value.into());
        self
    }

    pub fn remove_option(&mut self, name: &str) -> Result<&mut Self> {
        self.config
            .options
            .shift_remove(name)
            .ok_or_else(|| Error::description(format!("Option {} has not been set", name)))?;
        Ok(self)
    }

    pub fn build(self) -> ProvisioningConfig {
        self.config
    }
}

impl FeaturePackDepsEdit for ProvisioningConfigBuilder {
    fn deps_mut(&mut self) -> &mut FeaturePackDepsConfig {
        &mut self.config.deps
    }
}

impl ConfigCustomizationsEdit for ProvisioningConfigBuilder {
    fn customizations_mut(&mut self) -> &mut ConfigCustomizations {
        self.config.deps.configs_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigId;
    use crate::fp::FeaturePackConfig;
    use crate::location::FeaturePackLocation;

    fn fpl(s: &str) -> FeaturePackLocation {
        s.parse().unwrap()
    }

    #[test]
    fn test_options() {
        let mut builder = ProvisioningConfig::builder();
        builder.add_option("jvm", "17").add_option("jvm", "21");
        assert!(builder.remove_option("missing").unwrap_err().is_description());
        let config = builder.build();
        assert_eq!(config.option("jvm"), Some("21"));
    }

    #[test]
    fn test_builder_from_replays_everything() {
        let mut builder = ProvisioningConfig::builder();
        builder
            .add_feature_pack_dep(Some("web"), FeaturePackConfig::builder(fpl("web@u(r):1.x#1.0")).build())
            .unwrap()
            .add_feature_pack_dep(None, FeaturePackConfig::builder(fpl("core@u(r):1.x#1.0")).build())
            .unwrap()
            .add_transitive_dep(
                Some("base"),
                FeaturePackConfig::transitive_builder(fpl("base@u(r):1.x#1.0")).build(),
            )
            .unwrap()
            .exclude_default_config(ConfigId::named("standalone", "ha.xml"))
            .unwrap()
            .add_option("b", "1")
            .add_option("a", "2");
        let original = builder.build();

        let copy = ProvisioningConfig::builder_from(&original).unwrap().build();
        assert_eq!(copy, original);

        let mut edited = ProvisioningConfig::builder_from(&original).unwrap();
        edited
            .remove_feature_pack_dep(&fpl("web@u(r):1.x#1.0"))
            .unwrap();
        let edited = edited.build();
        assert_eq!(edited.deps().feature_pack_deps().count(), 1);
        assert_eq!(original.deps().feature_pack_deps().count(), 2);
        assert_eq!(edited.deps().dep_by_origin("base").unwrap().location().producer_name(), "base");
    }
}
