// src/config/mod.rs

//! Configuration model
//!
//! Features are configured individually ([`FeatureConfig`]) or composed into
//! groups. Groups, layers and config models all share a [`FeatureGroupBody`]
//! and are edited through the [`FeatureGroupEdit`] trait. Which configs a
//! feature-pack dependency installs is controlled by
//! [`ConfigCustomizations`].

mod customizations;
mod feature;
mod group;
mod id;
mod layer;
mod model;

pub use customizations::{ConfigCustomizations, ConfigCustomizationsEdit};
pub use feature::{FeatureConfig, FeatureConfigBuilder};
pub use group::{ConfigItem, FeatureGroup, FeatureGroupBody, FeatureGroupBuilder, FeatureGroupEdit};
pub use id::ConfigId;
pub use layer::{ConfigLayerDependency, ConfigLayerSpec, ConfigLayerSpecBuilder};
pub use model::{ConfigModel, ConfigModelBuilder};
