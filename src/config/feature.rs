// src/config/feature.rs

//! Configured features

use indexmap::{IndexMap, IndexSet};

use super::group::{ConfigItem, FeatureGroup};
use crate::error::{Error, Result};
use crate::spec::{FeatureDependencySpec, FeatureId, SpecId};

/// One configured feature: a spec plus parameter values
///
/// Parameters can also be explicitly unset (no value at all) or reset (back
/// to the spec default). A feature may nest child features and groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureConfig {
    spec: SpecId,
    origin: Option<String>,
    params: IndexMap<String, String>,
    unset: IndexSet<String>,
    reset: IndexSet<String>,
    deps: IndexMap<FeatureId, FeatureDependencySpec>,
    parent_ref: Option<String>,
    items: Vec<ConfigItem>,
}

impl FeatureConfig {
    pub fn builder(spec: impl Into<SpecId>) -> FeatureConfigBuilder {
        FeatureConfigBuilder {
            config: FeatureConfig {
                spec: spec.into(),
                origin: None,
                params: IndexMap::new(),
                unset: IndexSet::new(),
                reset: IndexSet::new(),
                deps: IndexMap::new(),
                parent_ref: None,
                items: Vec::new(),
            },
        }
    }

    /// A builder seeded with the spec and parameters of an id
    pub fn from_id(id: &FeatureId) -> FeatureConfigBuilder {
        let mut builder = Self::builder(id.spec().clone());
        builder.config.params = id.params().clone();
        builder
    }

    pub fn builder_from(config: &FeatureConfig) -> FeatureConfigBuilder {
        FeatureConfigBuilder {
            config: config.clone(),
        }
    }

    pub fn spec(&self) -> &SpecId {
        &self.spec
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn unset_params(&self) -> &IndexSet<String> {
        &self.unset
    }

    pub fn is_unset(&self, name: &str) -> bool {
        self.unset.contains(name)
    }

    pub fn reset_params(&self) -> &IndexSet<String> {
        &self.reset
    }

    pub fn is_reset(&self, name: &str) -> bool {
        self.reset.contains(name)
    }

    pub fn feature_deps(&self) -> &IndexMap<FeatureId, FeatureDependencySpec> {
        &self.deps
    }

    /// Name of the reference to the parent when this feature is nested
    pub fn parent_ref(&self) -> Option<&str> {
        self.parent_ref.as_deref()
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    /// True when every parameter of the id is set to the same value here
    pub fn matches_id(&self, id: &FeatureId) -> bool {
        &self.spec == id.spec()
            && id
                .params()
                .iter()
                .all(|(name, value)| self.params.get(name) == Some(value))
    }
}

/// Accumulates a [`FeatureConfig`]
///
/// A parameter is in at most one of the set, unset and reset states.
#[derive(Debug, Clone)]
pub struct FeatureConfigBuilder {
    config: FeatureConfig,
}

impl FeatureConfigBuilder {
    fn check_param_state(&self, name: &str, wanted: &str) -> Result<()> {
        let current = if self.config.params.contains_key(name) {
            Some("set")
        } else if self.config.unset.contains(name) {
            Some("unset")
        } else if self.config.reset.contains(name) {
            Some("reset")
        } else {
            None
        };
        match current {
            Some(state) if state != wanted => Err(Error::description(format!(
                "Parameter {} of {} is already {}",
                name, self.config.spec, state
            ))),
            _ => Ok(()),
        }
    }

    pub fn set_origin(&mut self, origin: impl Into<String>) -> &mut Self {
        self.config.origin = Some(origin.into());
        self
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.check_param_state(&name, "set")?;
        self.config.params.insert(name, value.into());
        Ok(self)
    }

    pub fn unset_param(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.check_param_state(&name, "unset")?;
        self.config.unset.insert(name);
        Ok(self)
    }

    pub fn reset_param(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.check_param_state(&name, "reset")?;
        self.config.reset.insert(name);
        Ok(self)
    }

    pub fn add_feature_dep(&mut self, dep: FeatureDependencySpec) -> Result<&mut Self> {
        if self.config.deps.contains_key(dep.feature_id()) {
            return Err(Error::description(format!(
                "Duplicate dependency on {} for feature of {}",
                dep.feature_id(),
                self.config.spec
            )));
        }
        self.config.deps.insert(dep.feature_id().clone(), dep);
        Ok(self)
    }

    pub fn set_parent_ref(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.parent_ref = Some(name.into());
        self
    }

    pub fn add_feature(&mut self, feature: FeatureConfig) -> &mut Self {
        self.config.items.push(ConfigItem::Feature(feature));
        self
    }

    pub fn add_group(&mut self, group: FeatureGroup) -> &mut Self {
        self.config.items.push(ConfigItem::Group(group));
        self
    }

    pub fn spec(&self) -> &SpecId {
        &self.config.spec
    }

    pub fn build(self) -> FeatureConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_states_are_exclusive() {
        let mut builder = FeatureConfig::builder("interface");
        builder.set_param("name", "public").unwrap();
        builder.set_param("name", "private").unwrap();
        assert!(builder.unset_param("name").unwrap_err().is_description());
        assert!(builder.reset_param("name").is_err());

        builder.unset_param("comment").unwrap();
        assert!(builder.set_param("comment", "x").is_err());

        let config = builder.build();
        assert_eq!(config.param("name"), Some("private"));
        assert!(config.is_unset("comment"));
    }

    #[test]
    fn test_from_id() {
        let id = FeatureId::parse("interface:name=public").unwrap();
        let mut builder = FeatureConfig::from_id(&id);
        builder.set_param("address", "0.0.0.0").unwrap();
        let config = builder.build();
        assert!(config.matches_id(&id));
        assert!(!config.matches_id(&FeatureId::new("interface", "name", "private")));
    }

    #[test]
    fn test_nested_items() {
        let child = FeatureConfig::builder("child").build();
        let mut parent = FeatureConfig::builder("parent");
        parent.add_feature(child.clone()).set_parent_ref("parent");
        let parent = parent.build();
        assert_eq!(parent.items(), &[ConfigItem::Feature(child)]);
        assert_eq!(parent.parent_ref(), Some("parent"));
    }
}
