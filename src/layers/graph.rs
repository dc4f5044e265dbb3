// src/layers/graph.rs

//! Layer dependency graph and closure computation
//!
//! Layers reference each other by name and the references may form cycles,
//! for example two layers that optionally depend on each other. The closure
//! walk keeps a visited set so every layer is entered exactly once, and
//! records layers in post-order so dependencies come before dependents.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::directive::LayerDirective;
use crate::config::{ConfigLayerSpec, ConfigModel};
use crate::error::{Error, Result};

/// Outcome of resolving the layers of a config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerResolution {
    active: Vec<String>,
    excluded: Vec<String>,
    dropped: Vec<String>,
}

impl LayerResolution {
    /// Active layers, dependencies before dependents
    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|l| l == name)
    }

    /// Layers the config explicitly excludes
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// Layers left out because a required dependency of theirs is excluded
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }
}

/// All known layers, per config model
#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    models: IndexMap<String, IndexMap<String, ConfigLayerSpec>>,
}

impl LayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layers<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = ConfigLayerSpec>,
    {
        let mut graph = Self::new();
        for layer in layers {
            graph.add_layer(layer)?;
        }
        Ok(graph)
    }

    pub fn add_layer(&mut self, layer: ConfigLayerSpec) -> Result<&mut Self> {
        let layers = self.models.entry(layer.model().to_string()).or_default();
        if layers.contains_key(layer.name()) {
            return Err(Error::description(format!(
                "Config layer {} is already defined for model {}",
                layer.name(),
                layer.model()
            )));
        }
        layers.insert(layer.name().to_string(), layer);
        Ok(self)
    }

    pub fn layer(&self, model: &str, name: &str) -> Option<&ConfigLayerSpec> {
        self.models.get(model).and_then(|layers| layers.get(name))
    }

    /// Layers of a model in definition order
    pub fn layers(&self, model: &str) -> impl Iterator<Item = &ConfigLayerSpec> {
        self.models.get(model).into_iter().flat_map(|layers| layers.values())
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    fn model_layers(&self, config: &ConfigModel) -> Result<Option<&IndexMap<String, ConfigLayerSpec>>> {
        if config.included_layers().next().is_none() {
            return Ok(config.model().and_then(|m| self.models.get(m)));
        }
        let model = config.model().ok_or_else(|| {
            Error::resolution(format!(
                "Config {} includes layers but has no model",
                config.id()
            ))
        })?;
        Ok(self.models.get(model))
    }

    /// Compute the active layers of a config
    ///
    /// Every included layer must be defined, and none of the layers it
    /// requires may be excluded. Non-included layers that require an
    /// excluded layer are dropped, and the closure is walked again without
    /// them until no further layer drops out.
    pub fn resolve(&self, config: &ConfigModel) -> Result<LayerResolution> {
        let empty = IndexMap::new();
        let layers = self.model_layers(config)?.unwrap_or(&empty);
        let model = config.model().unwrap_or_default();

        let roots: Vec<&str> = config.included_layers().collect();
        if let Some(root) = roots.iter().find(|root| !layers.contains_key(**root)) {
            return Err(Error::resolution(format!(
                "Config layer {} is not defined for model {}",
                root, model
            )));
        }

        let excluded: Vec<String> = config.excluded_layers().map(String::from).collect();
        let mut dropped: Vec<String> = Vec::new();
        loop {
            let blocked: IndexSet<&str> =
                excluded.iter().chain(&dropped).map(String::as_str).collect();
            let mut walk = Closure {
                model,
                layers,
                blocked: &blocked,
                visited: IndexSet::new(),
                order: Vec::new(),
            };
            for root in &roots {
                walk.visit(root)?;
            }
            let active = walk.order;

            let present: IndexSet<&str> = active.iter().map(String::as_str).collect();
            let mut removed = Vec::new();
            for name in &active {
                let missing = layers.get(name).and_then(|layer| {
                    layer
                        .layer_deps()
                        .filter(|dep| !dep.is_optional())
                        .find(|dep| layers.contains_key(dep.name()) && !present.contains(dep.name()))
                });
                let Some(dep) = missing else {
                    continue;
                };
                if config.is_layer_included(name) {
                    return Err(Error::resolution(format!(
                        "Config layer {} requires layer {} which has been excluded",
                        name,
                        dep.name()
                    )));
                }
                debug!("dropping layer {}: required layer {} is excluded", name, dep.name());
                removed.push(name.clone());
            }

            if removed.is_empty() {
                debug!(
                    "config {} resolved to {} active layers",
                    config.id(),
                    active.len()
                );
                return Ok(LayerResolution {
                    active,
                    excluded,
                    dropped,
                });
            }
            dropped.extend(removed);
        }
    }

    /// Include a layer and its dependencies
    pub fn include(&self, config: &ConfigModel, name: &str) -> Result<ConfigModel> {
        let model = config.model().unwrap_or_default();
        if self.layer(model, name).is_none() {
            return Err(Error::resolution(format!(
                "Config layer {} is not defined for model {}",
                name, model
            )));
        }
        let mut builder = ConfigModel::builder_from(config);
        builder.include_layer(name)?;
        self.validated(builder.build())
    }

    /// Exclude a layer that is active only as a dependency
    pub fn exclude(&self, config: &ConfigModel, name: &str) -> Result<ConfigModel> {
        if config.is_layer_included(name) {
            return Err(Error::description(format!(
                "Config layer {} is explicitly included in {} and cannot be excluded",
                name,
                config.id()
            )));
        }
        if config.is_layer_excluded(name) {
            return Err(Error::description(format!(
                "Config layer {} is already excluded from {}",
                name,
                config.id()
            )));
        }

        let current = self.resolve(config)?;
        if !current.is_active(name) {
            return Err(Error::description(format!(
                "Config layer {} is not a dependency of {}",
                name,
                config.id()
            )));
        }

        let model = config.model().unwrap_or_default();
        for included in config.included_layers() {
            if self.required_closure(model, included).contains(name) {
                return Err(Error::description(format!(
                    "Config layer {} is required by included layer {}",
                    name, included
                )));
            }
        }

        let mut builder = ConfigModel::builder_from(config);
        builder.exclude_layer(name)?;
        self.validated(builder.build())
    }

    /// Lift a previous exclusion
    pub fn unexclude(&self, config: &ConfigModel, name: &str) -> Result<ConfigModel> {
        if !config.is_layer_excluded(name) {
            return Err(Error::description(format!(
                "Config layer {} has not been excluded from {}",
                name,
                config.id()
            )));
        }
        let mut builder = ConfigModel::builder_from(config);
        builder.remove_excluded_layer(name)?;
        self.validated(builder.build())
    }

    /// Drop an explicit inclusion; the layer stays if something else needs it
    pub fn remove_included(&self, config: &ConfigModel, name: &str) -> Result<ConfigModel> {
        let mut builder = ConfigModel::builder_from(config);
        builder.remove_included_layer(name)?;
        self.validated(builder.build())
    }

    pub fn apply(&self, config: &ConfigModel, directive: &LayerDirective) -> Result<ConfigModel> {
        trace!("applying layer directive {} to {}", directive, config.id());
        match directive {
            LayerDirective::Include(name) => self.include(config, name),
            LayerDirective::Exclude(name) => self.exclude(config, name),
            LayerDirective::Unexclude(name) => self.unexclude(config, name),
        }
    }

    /// Layers reachable from `root` over required dependencies only
    fn required_closure<'a>(&'a self, model: &str, root: &'a str) -> IndexSet<&'a str> {
        let mut seen = IndexSet::new();
        let mut pending = vec![root];
        while let Some(name) = pending.pop() {
            let Some(layer) = self.layer(model, name) else {
                continue;
            };
            if !seen.insert(name) {
                continue;
            }
            pending.extend(
                layer
                    .layer_deps()
                    .filter(|dep| !dep.is_optional())
                    .map(|dep| dep.name()),
            );
        }
        seen
    }

    fn validated(&self, config: ConfigModel) -> Result<ConfigModel> {
        self.resolve(&config)?;
        Ok(config)
    }
}

/// Post-order walk over layer dependencies with a visited set
struct Closure<'a> {
    model: &'a str,
    layers: &'a IndexMap<String, ConfigLayerSpec>,
    blocked: &'a IndexSet<&'a str>,
    visited: IndexSet<String>,
    order: Vec<String>,
}

impl Closure<'_> {
    fn visit(&mut self, name: &str) -> Result<()> {
        if self.blocked.contains(name) || !self.visited.insert(name.to_string()) {
            return Ok(());
        }
        let layers = self.layers;
        let Some(layer) = layers.get(name) else {
            return Ok(());
        };

        for dep in layer.layer_deps() {
            if !layers.contains_key(dep.name()) {
                if dep.is_optional() {
                    trace!("skipping undefined optional layer {} of {}", dep.name(), name);
                    continue;
                }
                return Err(Error::resolution(format!(
                    "Config layer {} of model {} requires undefined layer {}",
                    name,
                    self.model,
                    dep.name()
                )));
            }
            self.visit(dep.name())?;
        }
        self.order.push(name.to_string());
        Ok(())
    }
}
