// src/capability/mod.rs
//! Capability expressions for feature specs
//!
//! Feature specs declare the capabilities they provide and require as dotted
//! expressions. A segment prefixed with `$` is dynamic: its value is taken
//! from the feature at hand (usually one of its parameters). All other
//! segments are static literals.
//!
//! # Example
//!
//! ```
//! use fpack::capability::{CapabilitySpec, ParamsResolver};
//! use indexmap::IndexMap;
//!
//! let cap = CapabilitySpec::parse("org.app.$profile.socket", false).unwrap();
//! assert_eq!(cap.segments().len(), 3);
//!
//! let mut params = IndexMap::new();
//! params.insert("profile".to_string(), "full".to_string());
//! let mut resolver = ParamsResolver::new(&params);
//! assert!(cap.resolve(&mut resolver));
//! assert_eq!(resolver.resolved(), "org.app.full.socket");
//! ```

mod resolver;
mod spec;

pub use resolver::{CapabilityResolver, ParamsResolver};
pub use spec::{CapabilitySpec, Segment};
