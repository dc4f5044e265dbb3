// src/config/model.rs

//! Config models: a target configuration assembled from layers and features

use indexmap::IndexMap;

use super::group::{FeatureGroupBody, FeatureGroupEdit};
use super::id::ConfigId;
use crate::error::{Error, Result};
use crate::selection::Selection;

/// A configuration to produce, identified by model and name
///
/// Layer names are included or excluded here; which layers end up active is
/// decided by [`crate::layers::LayerGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigModel {
    id: ConfigId,
    body: FeatureGroupBody,
    inherit_layers: bool,
    layers: Selection<String>,
    props: IndexMap<String, String>,
    config_deps: IndexMap<String, ConfigId>,
}

impl ConfigModel {
    pub fn builder(model: Option<String>, name: Option<String>) -> ConfigModelBuilder {
        ConfigModelBuilder {
            config: ConfigModel {
                id: ConfigId::new(model, name),
                body: FeatureGroupBody::new(),
                inherit_layers: true,
                layers: Selection::new(),
                props: IndexMap::new(),
                config_deps: IndexMap::new(),
            },
        }
    }

    /// A builder seeded with an existing config
    pub fn builder_from(config: &ConfigModel) -> ConfigModelBuilder {
        ConfigModelBuilder {
            config: config.clone(),
        }
    }

    pub fn id(&self) -> &ConfigId {
        &self.id
    }

    pub fn model(&self) -> Option<&str> {
        self.id.model()
    }

    pub fn name(&self) -> Option<&str> {
        self.id.name()
    }

    pub fn body(&self) -> &FeatureGroupBody {
        &self.body
    }

    /// Whether layer selections of same-id configs provided by feature-packs
    /// are merged into this one
    ///
    /// The flag only matters when configs from several sources are merged.
    /// [`crate::layers::LayerGraph::resolve`] sees the selection of this
    /// config alone and does not read it.
    pub fn is_inherit_layers(&self) -> bool {
        self.inherit_layers
    }

    pub fn included_layers(&self) -> impl Iterator<Item = &str> {
        self.layers.included().keys().map(String::as_str)
    }

    pub fn excluded_layers(&self) -> impl Iterator<Item = &str> {
        self.layers.excluded().keys().map(String::as_str)
    }

    pub fn is_layer_included(&self, name: &str) -> bool {
        self.layers.is_included(name)
    }

    pub fn is_layer_excluded(&self, name: &str) -> bool {
        self.layers.is_excluded(name)
    }

    pub fn props(&self) -> &IndexMap<String, String> {
        &self.props
    }

    pub fn config_deps(&self) -> &IndexMap<String, ConfigId> {
        &self.config_deps
    }
}

#[derive(Debug, Clone)]
pub struct ConfigModelBuilder {
    config: ConfigModel,
}

impl ConfigModelBuilder {
    pub fn set_inherit_layers(&mut self, inherit: bool) -> &mut Self {
        self.config.inherit_layers = inherit;
        self
    }

    pub fn include_layer(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.config
            .layers
            .include(name.clone(), ())
            .map_err(|c| c.describe("Config layer", &name))?;
        Ok(self)
    }

    pub fn exclude_layer(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        self.config
            .layers
            .exclude(name.clone(), ())
            .map_err(|c| c.describe("Config layer", &name))?;
        Ok(self)
    }

    pub fn remove_included_layer(&mut self, name: &str) -> Result<&mut Self> {
        self.config.layers.remove_included(name).ok_or_else(|| {
            Error::description(format!(
                "Config layer {} is not included in {}",
                name, self.config.id
            ))
        })?;
        Ok(self)
    }

    pub fn remove_excluded_layer(&mut self, name: &str) -> Result<&mut Self> {
        self.config.layers.remove_excluded(name).ok_or_else(|| {
            Error::description(format!(
                "Config layer {} is not excluded from {}",
                name, self.config.id
            ))
        })?;
        Ok(self)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.config.props.insert(name.into(), value.into());
        self
    }

    /// Make this config depend on another one
    pub fn set_config_dep(&mut self, name: impl Into<String>, id: ConfigId) -> &mut Self {
        self.config.config_deps.insert(name.into(), id);
        self
    }

    pub fn id(&self) -> &ConfigId {
        &self.config.id
    }

    pub fn build(self) -> ConfigModel {
        self.config
    }
}

impl FeatureGroupEdit for ConfigModelBuilder {
    fn group_body_mut(&mut self) -> &mut FeatureGroupBody {
        &mut self.config.body
    }
}
