// src/layers/mod.rs

//! Config layer resolution
//!
//! A [`LayerGraph`] holds the layers known for each config model and
//! computes which of them are active for a [`crate::config::ConfigModel`].
//! Edits to a config's layer selection go through the graph so that they
//! are checked against the current closure:
//!
//! - including a layer pulls in everything it depends on
//! - a layer can only be excluded while it is active purely as a dependency
//! - `+name` lifts an earlier exclusion
//!
//! # Example
//!
//! ```
//! use fpack::config::{ConfigLayerSpec, ConfigModel};
//! use fpack::layers::LayerGraph;
//!
//! let base = ConfigLayerSpec::builder("standalone", "base").build();
//! let mut web = ConfigLayerSpec::builder("standalone", "web");
//! web.add_layer_dep("base", false);
//! let graph = LayerGraph::from_layers([base, web.build()]).unwrap();
//!
//! let config = ConfigModel::builder(Some("standalone".into()), None).build();
//! let config = graph.apply(&config, &"web".parse().unwrap()).unwrap();
//! assert_eq!(graph.resolve(&config).unwrap().active(), &["base", "web"]);
//! ```

mod directive;
mod graph;

pub use directive::LayerDirective;
pub use graph::{LayerGraph, LayerResolution};
