// src/spec/mod.rs

//! Feature spec model
//!
//! A feature spec describes a kind of configuration unit: its parameters
//! (some of which form the feature's identity), the features it depends on,
//! the features it references by parameter value, the capabilities it
//! provides and requires, free-form annotations, and the packages that must
//! be installed whenever a feature of this spec is configured.
//!
//! # Example
//!
//! ```
//! use fpack::spec::{FeatureParameterSpec, FeatureSpec};
//!
//! let mut builder = FeatureSpec::builder("socket-binding");
//! builder
//!     .add_param(FeatureParameterSpec::id("name"))
//!     .unwrap()
//!     .add_param(FeatureParameterSpec::new("port"))
//!     .unwrap()
//!     .provides_capability("org.app.socket.$name")
//!     .unwrap();
//! let spec = builder.build();
//! assert_eq!(spec.id_params(), &["name".to_string()]);
//! ```

mod annotation;
mod dependency;
mod feature;
mod id;
mod param;
mod reference;

pub use annotation::FeatureAnnotation;
pub use dependency::FeatureDependencySpec;
pub use feature::{FeatureSpec, FeatureSpecBuilder};
pub use id::{FeatureId, SpecId};
pub use param::{FeatureParameterSpec, FeatureParameterSpecBuilder, DEFAULT_PARAM_TYPE};
pub use reference::{FeatureReferenceSpec, FeatureReferenceSpecBuilder};
