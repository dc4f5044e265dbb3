// src/spec/reference.rs

//! Named references from one feature to another

use indexmap::IndexMap;

use super::id::SpecId;
use crate::error::{Error, Result};

/// A reference to a feature of another spec, resolved from parameter values
///
/// Each mapping pairs a local parameter with an id parameter of the target
/// spec. Without mappings the local parameter is assumed to carry the
/// reference name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureReferenceSpec {
    name: String,
    origin: Option<String>,
    feature: SpecId,
    nillable: bool,
    include: bool,
    mappings: IndexMap<String, String>,
}

impl FeatureReferenceSpec {
    /// A required reference named after the target spec
    pub fn new(feature: impl Into<SpecId>) -> Self {
        let feature = feature.into();
        Self {
            name: feature.name().to_string(),
            origin: None,
            feature,
            nillable: false,
            include: false,
            mappings: IndexMap::new(),
        }
    }

    pub fn builder(feature: impl Into<SpecId>) -> FeatureReferenceSpecBuilder {
        FeatureReferenceSpecBuilder {
            spec: Self::new(feature),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn feature(&self) -> &SpecId {
        &self.feature
    }

    pub fn is_nillable(&self) -> bool {
        self.nillable
    }

    pub fn is_include(&self) -> bool {
        self.include
    }

    /// Local parameter name to target id parameter name
    pub fn mappings(&self) -> &IndexMap<String, String> {
        &self.mappings
    }

    /// Local parameters that must carry a value for the reference to resolve
    pub fn local_params(&self) -> Vec<&str> {
        if self.mappings.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.mappings.keys().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureReferenceSpecBuilder {
    spec: FeatureReferenceSpec,
}

impl FeatureReferenceSpecBuilder {
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.spec.name = name.into();
        self
    }

    pub fn origin(&mut self, origin: impl Into<String>) -> &mut Self {
        self.spec.origin = Some(origin.into());
        self
    }

    pub fn nillable(&mut self, nillable: bool) -> &mut Self {
        self.spec.nillable = nillable;
        self
    }

    pub fn include(&mut self, include: bool) -> &mut Self {
        self.spec.include = include;
        self
    }

    /// Map a local parameter onto an id parameter of the target
    pub fn map_param(
        &mut self,
        local: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<&mut Self> {
        let local = local.into();
        if self.spec.mappings.contains_key(&local) {
            return Err(Error::description(format!(
                "Parameter {} is already mapped in reference {}",
                local, self.spec.name
            )));
        }
        self.spec.mappings.insert(local, target.into());
        Ok(self)
    }

    pub fn build(self) -> FeatureReferenceSpec {
        self.spec
    }
}
