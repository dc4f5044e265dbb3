// src/config/id.rs

use std::fmt;

/// Identity of a config: a model, a name, both, or neither
///
/// A config with only a model is a model-only config; one with neither is
/// anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigId {
    model: Option<String>,
    name: Option<String>,
}

impl ConfigId {
    pub fn new(model: Option<String>, name: Option<String>) -> Self {
        Self { model, name }
    }

    /// A config with both model and name
    pub fn named(model: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Some(model.into()), Some(name.into()))
    }

    pub fn model_only(model: impl Into<String>) -> Self {
        Self::new(Some(model.into()), None)
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_model_only(&self) -> bool {
        self.model.is_some() && self.name.is_none()
    }

    pub fn is_anonymous(&self) -> bool {
        self.model.is_none() && self.name.is_none()
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.model, &self.name) {
            (Some(model), Some(name)) => write!(f, "model={} name={}", model, name),
            (Some(model), None) => write!(f, "model={}", model),
            (None, Some(name)) => write!(f, "name={}", name),
            (None, None) => f.write_str("anonymous"),
        }
    }
}
