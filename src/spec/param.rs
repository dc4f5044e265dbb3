// src/spec/param.rs

//! Feature parameter specs

use crate::error::{Error, Result};

/// Value type assumed when a parameter declares none
pub const DEFAULT_PARAM_TYPE: &str = "String";

/// A parameter of a feature spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureParameterSpec {
    name: String,
    feature_id: bool,
    nillable: bool,
    default_value: Option<String>,
    value_type: String,
}

impl FeatureParameterSpec {
    /// A required, non-id parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feature_id: false,
            nillable: false,
            default_value: None,
            value_type: DEFAULT_PARAM_TYPE.to_string(),
        }
    }

    /// An id parameter
    pub fn id(name: impl Into<String>) -> Self {
        Self {
            feature_id: true,
            ..Self::new(name)
        }
    }

    /// A parameter that may be left without a value
    pub fn nillable(name: impl Into<String>) -> Self {
        Self {
            nillable: true,
            ..Self::new(name)
        }
    }

    pub fn builder(name: impl Into<String>) -> FeatureParameterSpecBuilder {
        FeatureParameterSpecBuilder {
            spec: Self::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_feature_id(&self) -> bool {
        self.feature_id
    }

    pub fn is_nillable(&self) -> bool {
        self.nillable
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }
}

/// Builds a [`FeatureParameterSpec`], refusing id parameters that are
/// nillable
#[derive(Debug, Clone)]
pub struct FeatureParameterSpecBuilder {
    spec: FeatureParameterSpec,
}

impl FeatureParameterSpecBuilder {
    /// Make the parameter part of the feature's identity
    pub fn feature_id(&mut self) -> Result<&mut Self> {
        if self.spec.nillable {
            return Err(Error::description(format!(
                "Nillable parameter {} cannot be an id parameter",
                self.spec.name
            )));
        }
        self.spec.feature_id = true;
        Ok(self)
    }

    pub fn nillable(&mut self) -> Result<&mut Self> {
        if self.spec.feature_id {
            return Err(Error::description(format!(
                "Id parameter {} cannot be nillable",
                self.spec.name
            )));
        }
        self.spec.nillable = true;
        Ok(self)
    }

    pub fn default_value(&mut self, value: impl Into<String>) -> &mut Self {
        self.spec.default_value = Some(value.into());
        self
    }

    pub fn value_type(&mut self, value_type: impl Into<String>) -> &mut Self {
        self.spec.value_type = value_type.into();
        self
    }

    pub fn build(self) -> FeatureParameterSpec {
        self.spec
    }
}
