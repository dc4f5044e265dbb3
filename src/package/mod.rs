// src/package/mod.rs

//! Package dependency model
//!
//! Packages are the installable content units of a feature-pack. Each package
//! (and each feature spec) lists the packages it depends on, split into:
//!
//! - **local** dependencies on packages of the same feature-pack, keyed by name
//! - **external** dependencies on packages of another feature-pack, keyed by
//!   the origin name the consumer gave that dependency, then by package name
//!
//! Every dependency is classified as required, optional or passive. Passive
//! dependencies are optional ones that get activated on their own once all
//! of their required dependencies are installed.

mod deps;
mod resolve;
mod spec;

pub use deps::{PackageDepType, PackageDependencySpec, PackageDepsEdit, PackageDepsSpec};
pub use resolve::{PackageCatalog, ResolvedPackages};
pub use spec::{PackageSpec, PackageSpecBuilder};
