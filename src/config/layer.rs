// src/config/layer.rs

//! Config layer specs

use indexmap::IndexMap;

use super::group::{FeatureGroupBody, FeatureGroupEdit};
use super::id::ConfigId;

/// A dependency of one layer on another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayerDependency {
    name: String,
    optional: bool,
}

impl ConfigLayerDependency {
    pub fn new(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A named, reusable configuration fragment for one config model
///
/// Layers depend on each other by name. The dependency graph may contain
/// cycles; see [`crate::layers::LayerGraph`] for the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayerSpec {
    id: ConfigId,
    body: FeatureGroupBody,
    deps: IndexMap<String, ConfigLayerDependency>,
}

impl ConfigLayerSpec {
    pub fn builder(model: impl Into<String>, name: impl Into<String>) -> ConfigLayerSpecBuilder {
        ConfigLayerSpecBuilder {
            spec: ConfigLayerSpec {
                id: ConfigId::named(model, name),
                body: FeatureGroupBody::new(),
                deps: IndexMap::new(),
            },
        }
    }

    pub fn id(&self) -> &ConfigId {
        &self.id
    }

    pub fn model(&self) -> &str {
        self.id.model().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.id.name().unwrap_or_default()
    }

    pub fn body(&self) -> &FeatureGroupBody {
        &self.body
    }

    pub fn layer_deps(&self) -> impl Iterator<Item = &ConfigLayerDependency> {
        self.deps.values()
    }

    pub fn layer_dep(&self, name: &str) -> Option<&ConfigLayerDependency> {
        self.deps.get(name)
    }

    pub fn has_layer_deps(&self) -> bool {
        !self.deps.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLayerSpecBuilder {
    spec: ConfigLayerSpec,
}

impl ConfigLayerSpecBuilder {
    /// Declare a dependency; a repeated name replaces the earlier entry
    pub fn add_layer_dep(&mut self, name: impl Into<String>, optional: bool) -> &mut Self {
        let dep = ConfigLayerDependency::new(name, optional);
        self.spec.deps.insert(dep.name.clone(), dep);
        self
    }

    pub fn build(self) -> ConfigLayerSpec {
        self.spec
    }
}

impl FeatureGroupEdit for ConfigLayerSpecBuilder {
    fn group_body_mut(&mut self) -> &mut FeatureGroupBody {
        &mut self.spec.body
    }
}
