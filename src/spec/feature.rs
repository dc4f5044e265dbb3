// src/spec/feature.rs

//! Feature specs and their builder

use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::trace;

use super::annotation::FeatureAnnotation;
use super::dependency::FeatureDependencySpec;
use super::id::{FeatureId, SpecId};
use super::param::FeatureParameterSpec;
use super::reference::FeatureReferenceSpec;
use crate::capability::{CapabilitySpec, ParamsResolver};
use crate::config::FeatureConfig;
use crate::error::{Error, Result};
use crate::package::{PackageDepsEdit, PackageDepsSpec};

/// Declaration of a kind of feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    name: SpecId,
    id_params: Vec<String>,
    params: IndexMap<String, FeatureParameterSpec>,
    deps: IndexMap<FeatureId, FeatureDependencySpec>,
    refs: IndexMap<String, FeatureReferenceSpec>,
    provides: BTreeSet<CapabilitySpec>,
    requires: BTreeSet<CapabilitySpec>,
    annotations: IndexMap<String, FeatureAnnotation>,
    package_deps: PackageDepsSpec,
}

impl FeatureSpec {
    pub fn builder(name: impl Into<SpecId>) -> FeatureSpecBuilder {
        FeatureSpecBuilder {
            spec: FeatureSpec {
                name: name.into(),
                id_params: Vec::new(),
                params: IndexMap::new(),
                deps: IndexMap::new(),
                refs: IndexMap::new(),
                provides: BTreeSet::new(),
                requires: BTreeSet::new(),
                annotations: IndexMap::new(),
                package_deps: PackageDepsSpec::new(),
            },
        }
    }

    pub fn name(&self) -> &SpecId {
        &self.name
    }

    /// Id parameter names in declaration order
    pub fn id_params(&self) -> &[String] {
        &self.id_params
    }

    pub fn has_id(&self) -> bool {
        !self.id_params.is_empty()
    }

    pub fn params(&self) -> &IndexMap<String, FeatureParameterSpec> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&FeatureParameterSpec> {
        self.params.get(name)
    }

    pub fn feature_deps(&self) -> &IndexMap<FeatureId, FeatureDependencySpec> {
        &self.deps
    }

    pub fn feature_refs(&self) -> &IndexMap<String, FeatureReferenceSpec> {
        &self.refs
    }

    pub fn feature_ref(&self, name: &str) -> Option<&FeatureReferenceSpec> {
        self.refs.get(name)
    }

    pub fn provided_capabilities(&self) -> &BTreeSet<CapabilitySpec> {
        &self.provides
    }

    pub fn required_capabilities(&self) -> &BTreeSet<CapabilitySpec> {
        &self.requires
    }

    pub fn annotations(&self) -> &IndexMap<String, FeatureAnnotation> {
        &self.annotations
    }

    pub fn annotation(&self, name: &str) -> Option<&FeatureAnnotation> {
        self.annotations.get(name)
    }

    pub fn package_deps(&self) -> &PackageDepsSpec {
        &self.package_deps
    }

    /// Value a config gives a parameter, falling back to the declared default
    fn effective_value<'a>(&'a self, config: &'a FeatureConfig, name: &str) -> Option<&'a str> {
        if config.is_unset(name) {
            return None;
        }
        config
            .param(name)
            .or_else(|| self.params.get(name).and_then(|p| p.default_value()))
    }

    /// Compose the identity of a configured feature
    ///
    /// Id parameters are taken in declaration order. Each must carry a value
    /// in the config or a default in the spec.
    pub fn feature_id(&self, config: &FeatureConfig) -> Result<FeatureId> {
        if !self.has_id() {
            return Err(Error::description(format!(
                "Feature spec {} does not declare id parameters",
                self.name
            )));
        }
        let mut pairs = Vec::with_capacity(self.id_params.len());
        for name in &self.id_params {
            let value = self.effective_value(config, name).ok_or_else(|| {
                Error::description(format!(
                    "Id parameter {} of {} has no value",
                    name, self.name
                ))
            })?;
            pairs.push((name.as_str(), value));
        }
        FeatureId::from_params(self.name.clone(), pairs)
    }

    /// Check a feature config against this spec
    pub fn validate_config(&self, config: &FeatureConfig) -> Result<()> {
        if config.spec() != &self.name {
            return Err(Error::description(format!(
                "Feature of spec {} cannot be validated against spec {}",
                config.spec(),
                self.name
            )));
        }

        for name in config.params().keys().chain(config.unset_params()) {
            if !self.params.contains_key(name) {
                return Err(Error::description(format!(
                    "Feature spec {} does not declare parameter {}",
                    self.name, name
                )));
            }
        }

        for param in self.params.values() {
            if param.is_nillable() {
                continue;
            }
            if config.is_unset(param.name()) {
                return Err(Error::description(format!(
                    "Parameter {} of {} is not nillable and cannot be unset",
                    param.name(),
                    self.name
                )));
            }
            if self.effective_value(config, param.name()).is_none() {
                return Err(Error::description(format!(
                    "Parameter {} of {} has no value",
                    param.name(),
                    self.name
                )));
            }
        }

        for reference in self.refs.values() {
            if reference.is_nillable() {
                continue;
            }
            let missing = reference
                .local_params()
                .into_iter()
                .any(|local| self.effective_value(config, local).is_none());
            if missing {
                return Err(Error::description(format!(
                    "Feature of {} is missing required reference {}",
                    self.name,
                    reference.name()
                )));
            }
        }
        Ok(())
    }

    /// Concrete names of the capabilities a configured feature provides
    ///
    /// Expressions whose dynamic segments cannot be resolved from the
    /// parameters are skipped.
    pub fn resolve_provided_capabilities(&self, config: &FeatureConfig) -> Vec<String> {
        let mut names = Vec::new();
        for capability in &self.provides {
            let mut resolver = ParamsResolver::new(config.params());
            if capability.resolve(&mut resolver) {
                names.push(resolver.into_resolved());
            } else {
                trace!("capability {} of {} did not resolve", capability, self.name);
            }
        }
        names
    }
}

/// Accumulates a [`FeatureSpec`], rejecting duplicate declarations
#[derive(Debug, Clone)]
pub struct FeatureSpecBuilder {
    spec: FeatureSpec,
}

impl FeatureSpecBuilder {
    pub fn add_param(&mut self, param: FeatureParameterSpec) -> Result<&mut Self> {
        if self.spec.params.contains_key(param.name()) {
            return Err(Error::description(format!(
                "Duplicate parameter {} for feature spec {}",
                param.name(),
                self.spec.name
            )));
        }
        if param.is_feature_id() {
            self.spec.id_params.push(param.name().to_string());
        }
        self.spec.params.insert(param.name().to_string(), param);
        Ok(self)
    }

    pub fn add_feature_dep(&mut self, dep: FeatureDependencySpec) -> Result<&mut Self> {
        if self.spec.deps.contains_key(dep.feature_id()) {
            return Err(Error::description(format!(
                "Duplicate dependency on {} for feature spec {}",
                dep.feature_id(),
                self.spec.name
            )));
        }
        self.spec.deps.insert(dep.feature_id().clone(), dep);
        Ok(self)
    }

    pub fn add_feature_ref(&mut self, reference: FeatureReferenceSpec) -> Result<&mut Self> {
        if self.spec.refs.contains_key(reference.name()) {
            return Err(Error::description(format!(
                "Duplicate reference {} for feature spec {}",
                reference.name(),
                self.spec.name
            )));
        }
        self.spec.refs.insert(reference.name().to_string(), reference);
        Ok(self)
    }

    pub fn add_annotation(&mut self, annotation: FeatureAnnotation) -> Result<&mut Self> {
        if self.spec.annotations.contains_key(annotation.name()) {
            return Err(Error::description(format!(
                "Duplicate annotation {} for feature spec {}",
                annotation.name(),
                self.spec.name
            )));
        }
        self.spec
            .annotations
            .insert(annotation.name().to_string(), annotation);
        Ok(self)
    }

    pub fn provides_capability(&mut self, expr: &str) -> Result<&mut Self> {
        let capability = CapabilitySpec::required(expr)?;
        self.spec.provides.insert(capability);
        Ok(self)
    }

    pub fn requires_capability(&mut self, expr: &str, optional: bool) -> Result<&mut Self> {
        let capability = CapabilitySpec::parse(expr, optional)?;
        self.spec.requires.insert(capability);
        Ok(self)
    }

    pub fn build(self) -> FeatureSpec {
        self.spec
    }
}

impl PackageDepsEdit for FeatureSpecBuilder {
    fn package_deps_mut(&mut self) -> &mut PackageDepsSpec {
        &mut self.spec.package_deps
    }
}
