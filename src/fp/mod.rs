// src/fp/mod.rs

//! Feature-pack dependencies
//!
//! [`FeaturePackConfig`] describes one dependency and how the consumer
//! customizes it. [`FeaturePackDepsConfig`] aggregates them, and is edited
//! through [`FeaturePackDepsEdit`] by every builder that owns one.

mod config;
mod deps;

pub use config::{FeaturePackConfig, FeaturePackConfigBuilder};
pub use deps::{FeaturePackDepsConfig, FeaturePackDepsConfigBuilder, FeaturePackDepsEdit};
