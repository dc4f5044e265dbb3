// src/location/mod.rs

//! Feature-pack locations
//!
//! A feature-pack location identifies a feature-pack producer, optionally the
//! universe it is published in, the channel followed, and a concrete build:
//!
//! ```text
//! producer[@universe][:channel[/frequency]][#build]
//! ```
//!
//! The universe is either a fully qualified `factory(location)` spec or a
//! bare name referring to a universe configured on the consumer.
//!
//! # Examples
//!
//! - `wildfly@maven(org.jboss.universe:community-universe):current#27.0.0.Final`
//! - `wildfly:current/beta`
//! - `wildfly@community#27.0.0.Final`
//!
//! Resolving a universe to a concrete repository is the job of the
//! surrounding tooling; this crate only substitutes configured specs.

mod fpl;
mod universe;

pub use fpl::{ChannelSpec, FeaturePackLocation, Fpid, ProducerSpec};
pub use universe::UniverseSpec;
