// src/spec/dependency.rs

//! Feature-to-feature dependencies

use super::id::FeatureId;

/// A dependency of one feature on another, identified by id
///
/// The target may live in another feature-pack (`origin`). With `include`
/// set, the target is added to the config when it is not there already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDependencySpec {
    feature_id: FeatureId,
    origin: Option<String>,
    include: bool,
}

impl FeatureDependencySpec {
    pub fn new(feature_id: FeatureId) -> Self {
        Self {
            feature_id,
            origin: None,
            include: false,
        }
    }

    pub fn create(feature_id: FeatureId, origin: Option<String>, include: bool) -> Self {
        Self {
            feature_id,
            origin,
            include,
        }
    }

    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_include(&self) -> bool {
        self.include
    }
}
