// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use fpack::config::{ConfigLayerSpec, ConfigModel};
use fpack::fp::FeaturePackConfig;
use fpack::layers::LayerGraph;
use fpack::location::FeaturePackLocation;

pub const MODEL: &str = "testmodel";

pub fn fpl(s: &str) -> FeaturePackLocation {
    FeaturePackLocation::parse(s).unwrap()
}

/// A direct dependency with no customizations
pub fn direct(location: &str) -> FeaturePackConfig {
    FeaturePackConfig::builder(fpl(location)).build()
}

pub fn transitive(location: &str) -> FeaturePackConfig {
    FeaturePackConfig::transitive_builder(fpl(location)).build()
}

/// A layer of [`MODEL`]; each dep is `(name, optional)`
pub fn layer(name: &str, deps: &[(&str, bool)]) -> ConfigLayerSpec {
    let mut builder = ConfigLayerSpec::builder(MODEL, name);
    for (dep, optional) in deps {
        builder.add_layer_dep(*dep, *optional);
    }
    builder.build()
}

pub fn graph(layers: Vec<ConfigLayerSpec>) -> LayerGraph {
    LayerGraph::from_layers(layers).unwrap()
}

/// An empty config of [`MODEL`] named `foo.xml`
pub fn config() -> ConfigModel {
    ConfigModel::builder(Some(MODEL.to_string()), Some("foo.xml".to_string())).build()
}

pub fn sorted(names: &[String]) -> Vec<&str> {
    let mut names: Vec<&str> = names.iter().map(String::as_str).collect();
    names.sort_unstable();
    names
}
