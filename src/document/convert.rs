// src/document/convert.rs

//! Conversion between documents and the configuration model
//!
//! Documents are turned into model objects through the builders, so a
//! document is subject to the same validation as programmatic edits.

use super::schema::*;
use crate::config::{
    ConfigCustomizations, ConfigCustomizationsEdit, ConfigId, ConfigItem, ConfigLayerSpec,
    ConfigModel, FeatureConfig, FeatureGroup, FeatureGroupBody, FeatureGroupEdit,
};
use crate::error::Result;
use crate::fp::{FeaturePackConfig, FeaturePackDepsEdit};
use crate::layers::LayerGraph;
use crate::location::{FeaturePackLocation, Fpid, UniverseSpec};
use crate::provisioning::ProvisioningConfig;
use crate::spec::{FeatureDependencySpec, FeatureId};

impl ProvisioningDocument {
    pub fn into_config(self) -> Result<ProvisioningConfig> {
        let mut builder = ProvisioningConfig::builder();

        if let Some(default) = &self.universes.default {
            builder.set_default_universe(Some(UniverseSpec::parse(default)?));
        }
        for (name, spec) in self.universes.named {
            builder.add_universe(name, UniverseSpec::parse(&spec)?)?;
        }
        for dep in self.dependencies {
            let origin = dep.origin.clone();
            builder.add_feature_pack_dep(origin.as_deref(), dep.into_config()?)?;
        }
        self.configs.apply(&mut builder)?;
        for (name, value) in self.options {
            builder.add_option(name, value);
        }
        Ok(builder.build())
    }

    pub fn from_config(config: &ProvisioningConfig) -> Self {
        let deps = config.deps();
        let mut dependencies = Vec::new();
        for dep in deps.feature_pack_deps().chain(deps.transitive_deps()) {
            let origin = deps.origin_of(&dep.location().producer());
            dependencies.push(DependencyDocument::from_config(dep, origin));
        }
        Self {
            options: config.options().clone(),
            universes: UniversesDocument {
                default: deps.default_universe().map(ToString::to_string),
                named: deps
                    .universes()
                    .iter()
                    .map(|(name, spec)| (name.clone(), spec.to_string()))
                    .collect(),
            },
            configs: CustomizationsDocument::from_customizations(config.configs()),
            dependencies,
        }
    }
}

impl DependencyDocument {
    pub fn into_config(self) -> Result<FeaturePackConfig> {
        let location = FeaturePackLocation::parse(&self.location)?;
        let mut builder = if self.transitive {
            FeaturePackConfig::transitive_builder(location)
        } else {
            FeaturePackConfig::builder(location)
        };
        if let Some(inherit) = self.inherit_packages {
            builder.set_inherit_packages(inherit);
        }
        for name in self.include_packages {
            builder.include_package(name)?;
        }
        for name in self.exclude_packages {
            builder.exclude_package(name)?;
        }
        for patch in &self.patches {
            builder.add_patch(Fpid::parse(patch)?)?;
        }
        builder.set_allowed_family(self.allowed_family);
        self.configs.apply(&mut builder)?;
        Ok(builder.build())
    }

    pub fn from_config(config: &FeaturePackConfig, origin: Option<&str>) -> Self {
        Self {
            location: config.location().to_string(),
            origin: origin.map(str::to_string),
            transitive: config.is_transitive(),
            inherit_packages: config.inherit_packages(),
            include_packages: config.included_packages().cloned().collect(),
            exclude_packages: config.excluded_packages().cloned().collect(),
            patches: config.patches().iter().map(ToString::to_string).collect(),
            allowed_family: config.is_allowed_family(),
            configs: CustomizationsDocument::from_customizations(config.configs()),
        }
    }
}

impl CustomizationsDocument {
    /// Replay the customizations into a builder
    pub fn apply<B: ConfigCustomizationsEdit>(self, builder: &mut B) -> Result<()> {
        if let Some(inherit) = self.inherit_configs {
            builder.set_inherit_configs(inherit);
        }
        if let Some(inherit) = self.inherit_model_only_configs {
            builder.set_inherit_model_only_configs(inherit);
        }
        for model in self.include_models {
            builder.include_config_model(model)?;
        }
        for excluded in self.exclude_models {
            builder.exclude_config_model(excluded.model, excluded.named_only)?;
        }
        for id in self.include_configs {
            builder.include_default_config(id.into_id())?;
        }
        for id in self.exclude_configs {
            builder.exclude_default_config(id.into_id())?;
        }
        for config in self.configs {
            builder.add_config(config.into_model()?)?;
        }
        Ok(())
    }

    pub fn from_customizations(custom: &ConfigCustomizations) -> Self {
        Self {
            inherit_configs: custom.inherit_configs(),
            inherit_model_only_configs: (!custom.is_inherit_model_only_configs()).then_some(false),
            include_models: custom.models().included().keys().cloned().collect(),
            exclude_models: custom
                .models()
                .excluded()
                .iter()
                .map(|(model, named_only)| ExcludedModelDocument {
                    model: model.clone(),
                    named_only: *named_only,
                })
                .collect(),
            include_configs: custom
                .configs()
                .included()
                .keys()
                .map(ConfigIdDocument::from_id)
                .collect(),
            exclude_configs: custom
                .configs()
                .excluded()
                .keys()
                .map(ConfigIdDocument::from_id)
                .collect(),
            configs: custom
                .defined_configs()
                .map(ConfigModelDocument::from_model)
                .collect(),
        }
    }
}

impl ConfigIdDocument {
    pub fn into_id(self) -> ConfigId {
        ConfigId::new(self.model, self.name)
    }

    pub fn from_id(id: &ConfigId) -> Self {
        Self {
            model: id.model().map(str::to_string),
            name: id.name().map(str::to_string),
        }
    }
}

impl ConfigModelDocument {
    pub fn into_model(self) -> Result<ConfigModel> {
        let mut builder = ConfigModel::builder(self.model, self.name);
        if let Some(inherit) = self.inherit_layers {
            builder.set_inherit_layers(inherit);
        }
        for layer in self.include_layers {
            builder.include_layer(layer)?;
        }
        for layer in self.exclude_layers {
            builder.exclude_layer(layer)?;
        }
        for (name, value) in self.props {
            builder.set_property(name, value);
        }
        for (name, id) in self.config_deps {
            builder.set_config_dep(name, id.into_id());
        }
        self.body.apply(&mut builder)?;
        Ok(builder.build())
    }

    pub fn from_model(config: &ConfigModel) -> Self {
        Self {
            model: config.model().map(str::to_string),
            name: config.name().map(str::to_string),
            inherit_layers: (!config.is_inherit_layers()).then_some(false),
            include_layers: config.included_layers().map(str::to_string).collect(),
            exclude_layers: config.excluded_layers().map(str::to_string).collect(),
            props: config.props().clone(),
            config_deps: config
                .config_deps()
                .iter()
                .map(|(name, id)| (name.clone(), ConfigIdDocument::from_id(id)))
                .collect(),
            body: GroupBodyDocument::from_body(config.body()),
        }
    }
}

impl GroupBodyDocument {
    /// Replay the body into a builder
    pub fn apply<B: FeatureGroupEdit>(self, builder: &mut B) -> Result<()> {
        if self.origin.is_some() {
            builder.set_origin(self.origin.clone())?;
        }
        if let Some(inherit) = self.inherit_features {
            builder.set_inherit_features(inherit);
        }
        self.selection.apply(builder, None)?;
        for (origin, selection) in self.external {
            selection.apply(builder, Some(origin.as_str()))?;
        }
        for item in self.items {
            match item {
                ItemDocument::Feature(feature) => {
                    builder.add_feature(feature.into_feature()?);
                }
                ItemDocument::Group(group) => {
                    builder.add_group(group.into_group()?);
                }
            }
        }
        Ok(())
    }

    pub fn from_body(body: &FeatureGroupBody) -> Self {
        Self {
            origin: body.origin().map(str::to_string),
            inherit_features: (!body.is_inherit_features()).then_some(false),
            selection: SelectionDocument::from_body(body),
            external: body
                .external_groups()
                .iter()
                .map(|(origin, external)| (origin.clone(), SelectionDocument::from_body(external)))
                .collect(),
            items: body.items().iter().map(ItemDocument::from_item).collect(),
        }
    }
}

impl SelectionDocument {
    fn apply<B: FeatureGroupEdit>(self, builder: &mut B, origin: Option<&str>) -> Result<()> {
        for spec in self.include_specs {
            match origin {
                Some(origin) => builder.include_spec_from(origin, spec)?,
                None => builder.include_spec(spec)?,
            };
        }
        for spec in self.exclude_specs {
            match origin {
                Some(origin) => builder.exclude_spec_from(origin, spec)?,
                None => builder.exclude_spec(spec)?,
            };
        }
        for included in self.include_features {
            let id = FeatureId::parse(&included.id)?;
            let feature = included.feature.map(FeatureDocument::into_feature).transpose()?;
            match origin {
                Some(origin) => builder.include_feature_from(origin, id, feature)?,
                None => builder.include_feature(id, feature)?,
            };
        }
        for excluded in self.exclude_features {
            let id = FeatureId::parse(&excluded.id)?;
            match origin {
                Some(origin) => builder.exclude_feature_from(origin, id, excluded.parent_ref)?,
                None => builder.exclude_feature(id, excluded.parent_ref)?,
            };
        }
        Ok(())
    }

    fn from_body(body: &FeatureGroupBody) -> Self {
        let features = body.features();
        Self {
            include_specs: body.specs().included().keys().map(ToString::to_string).collect(),
            exclude_specs: body.specs().excluded().keys().map(ToString::to_string).collect(),
            include_features: features
                .included()
                .iter()
                .map(|(id, feature)| IncludedFeatureDocument {
                    id: id.to_string(),
                    feature: feature.as_ref().map(FeatureDocument::from_feature),
                })
                .collect(),
            exclude_features: features
                .excluded()
                .iter()
                .map(|(id, parent_ref)| ExcludedFeatureDocument {
                    id: id.to_string(),
                    parent_ref: parent_ref.clone(),
                })
                .collect(),
        }
    }
}

impl ItemDocument {
    fn from_item(item: &ConfigItem) -> Self {
        match item {
            ConfigItem::Feature(feature) => ItemDocument::Feature(FeatureDocument::from_feature(feature)),
            ConfigItem::Group(group) => ItemDocument::Group(GroupDocument::from_group(group)),
        }
    }
}

impl GroupDocument {
    pub fn into_group(self) -> Result<FeatureGroup> {
        let mut builder = FeatureGroup::builder(self.name);
        self.body.apply(&mut builder)?;
        Ok(builder.build())
    }

    pub fn from_group(group: &FeatureGroup) -> Self {
        Self {
            name: group.name().to_string(),
            body: GroupBodyDocument::from_body(group.body()),
        }
    }
}

impl FeatureDocument {
    pub fn into_feature(self) -> Result<FeatureConfig> {
        let mut builder = FeatureConfig::builder(self.spec);
        if let Some(origin) = self.origin {
            builder.set_origin(origin);
        }
        for (name, value) in self.params {
            builder.set_param(name, value)?;
        }
        for name in self.unset {
            builder.unset_param(name)?;
        }
        for name in self.reset {
            builder.reset_param(name)?;
        }
        for dep in self.deps {
            let id = FeatureId::parse(&dep.id)?;
            builder.add_feature_dep(FeatureDependencySpec::create(id, dep.origin, dep.include))?;
        }
        if let Some(parent_ref) = self.parent_ref {
            builder.set_parent_ref(parent_ref);
        }
        for item in self.items {
            match item {
                ItemDocument::Feature(feature) => {
                    builder.add_feature(feature.into_feature()?);
                }
                ItemDocument::Group(group) => {
                    builder.add_group(group.into_group()?);
                }
            }
        }
        Ok(builder.build())
    }

    pub fn from_feature(feature: &FeatureConfig) -> Self {
        Self {
            spec: feature.spec().to_string(),
            origin: feature.origin().map(str::to_string),
            params: feature.params().clone(),
            unset: feature.unset_params().iter().cloned().collect(),
            reset: feature.reset_params().iter().cloned().collect(),
            deps: feature
                .feature_deps()
                .values()
                .map(|dep| FeatureDepDocument {
                    id: dep.feature_id().to_string(),
                    origin: dep.origin().map(str::to_string),
                    include: dep.is_include(),
                })
                .collect(),
            parent_ref: feature.parent_ref().map(str::to_string),
            items: feature.items().iter().map(ItemDocument::from_item).collect(),
        }
    }
}

impl LayerCatalogDocument {
    pub fn into_graph(self) -> Result<LayerGraph> {
        let layers = self
            .layers
            .into_iter()
            .map(LayerDocument::into_layer)
            .collect::<Result<Vec<_>>>()?;
        LayerGraph::from_layers(layers)
    }
}

impl LayerDocument {
    pub fn into_layer(self) -> Result<ConfigLayerSpec> {
        let mut builder = ConfigLayerSpec::builder(self.model, self.name);
        for dep in self.deps {
            builder.add_layer_dep(dep.name, dep.optional);
        }
        self.body.apply(&mut builder)?;
        Ok(builder.build())
    }

    pub fn from_layer(layer: &ConfigLayerSpec) -> Self {
        Self {
            model: layer.model().to_string(),
            name: layer.name().to_string(),
            deps: layer
                .layer_deps()
                .map(|dep| LayerDepDocument {
                    name: dep.name().to_string(),
                    optional: dep.is_optional(),
                })
                .collect(),
            body: GroupBodyDocument::from_body(layer.body()),
        }
    }
}
