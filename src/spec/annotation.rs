// src/spec/annotation.rs

//! Free-form feature annotations

use indexmap::IndexMap;

/// A named group of key/value pairs attached to a feature spec
///
/// The model does not interpret annotations; provisioning plugins do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureAnnotation {
    name: String,
    elems: IndexMap<String, String>,
}

impl FeatureAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elems: IndexMap::new(),
        }
    }

    pub fn with_elem(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.elems.insert(name.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elem(&self, name: &str) -> Option<&str> {
        self.elems.get(name).map(String::as_str)
    }

    pub fn elems(&self) -> &IndexMap<String, String> {
        &self.elems
    }
}
