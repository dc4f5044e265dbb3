// src/document/schema.rs

//! Serde structures for provisioning and layer catalog documents
//!
//! Keys are kebab-case. Empty collections and unset flags are left out when
//! writing, and default when reading.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// A provisioning configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProvisioningDocument {
    /// Free-form provisioning options
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "UniversesDocument::is_empty")]
    pub universes: UniversesDocument,

    /// Config customizations of the installation itself
    #[serde(flatten)]
    pub configs: CustomizationsDocument,

    /// Feature-pack dependencies in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyDocument>,
}

/// Universe specs, written as `factory(location)` strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UniversesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub named: IndexMap<String, String>,
}

impl UniversesDocument {
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.named.is_empty()
    }
}

/// One feature-pack dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DependencyDocument {
    /// Feature-pack location string
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub transitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_packages: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_packages: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_packages: Vec<String>,

    /// Patch feature-pack ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub allowed_family: bool,

    #[serde(flatten)]
    pub configs: CustomizationsDocument,
}

/// Config customizations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CustomizationsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_configs: Option<bool>,

    /// Defaults to true when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_model_only_configs: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_models: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_models: Vec<ExcludedModelDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_configs: Vec<ConfigIdDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_configs: Vec<ConfigIdDocument>,

    /// Locally defined configs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configs: Vec<ConfigModelDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExcludedModelDocument {
    pub model: String,

    /// Only exclude named configs of the model
    #[serde(default, skip_serializing_if = "is_false")]
    pub named_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigIdDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A config model definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigModelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_layers: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_layers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_layers: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub props: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config_deps: IndexMap<String, ConfigIdDocument>,

    #[serde(flatten)]
    pub body: GroupBodyDocument,
}

/// The body shared by groups, layers and config models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupBodyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_features: Option<bool>,

    #[serde(flatten)]
    pub selection: SelectionDocument,

    /// Overrides for features of other feature-packs, by origin
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub external: IndexMap<String, SelectionDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemDocument>,
}

/// Included and excluded specs and features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectionDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_specs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_specs: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_features: Vec<IncludedFeatureDocument>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_features: Vec<ExcludedFeatureDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IncludedFeatureDocument {
    /// Feature id, `spec:param=value,...`
    pub id: String,

    /// Parameter overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<FeatureDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExcludedFeatureDocument {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,
}

/// A child of a group or feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ItemDocument {
    Feature(FeatureDocument),
    Group(GroupDocument),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupDocument {
    pub name: String,

    #[serde(flatten)]
    pub body: GroupBodyDocument,
}

/// A configured feature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeatureDocument {
    pub spec: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unset: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reset: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<FeatureDepDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeatureDepDocument {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub include: bool,
}

/// A set of config layer definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerCatalogDocument {
    #[serde(default)]
    pub layers: Vec<LayerDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerDocument {
    pub model: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<LayerDepDocument>,

    #[serde(flatten)]
    pub body: GroupBodyDocument,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerDepDocument {
    pub name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}
