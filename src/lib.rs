// src/lib.rs

//! Feature-pack provisioning configuration
//!
//! A configuration model for provisioning installations out of
//! feature-packs, plus the resolution logic that runs over it.
//!
//! # Architecture
//!
//! - Specs: feature specs, parameters, references and capabilities
//!   published by a feature-pack
//! - Configs: configured features, groups, layers and config models
//! - Dependencies: feature-pack locations, universes and the dependency
//!   aggregate of an installation, keyed by producer
//! - Layers: dependency closure of config layers with include and exclude
//!   directives
//! - Documents: TOML and JSON encodings of provisioning configs and layer
//!   catalogs
//!
//! Every model object is immutable and built through a builder. Builder
//! calls validate before they mutate, so a failed call leaves the builder
//! as it was.

pub mod capability;
pub mod config;
pub mod document;
mod error;
pub mod fp;
pub mod layers;
pub mod location;
pub mod package;
pub mod provisioning;
pub mod selection;
pub mod spec;

pub use capability::{CapabilityResolver, CapabilitySpec};
pub use config::{ConfigId, ConfigModel, FeatureConfig, FeatureGroup};
pub use document::{DocumentError, DocumentResult, Format};
pub use error::{Error, Result};
pub use fp::{FeaturePackConfig, FeaturePackDepsConfig};
pub use layers::{LayerDirective, LayerGraph, LayerResolution};
pub use location::{FeaturePackLocation, Fpid, ProducerSpec, UniverseSpec};
pub use provisioning::{ProvisioningConfig, ProvisioningConfigBuilder};
pub use spec::{FeatureId, FeatureSpec, SpecId};
