// src/fp/deps.rs

//! Feature-pack dependency aggregate
//!
//! Dependencies are keyed by producer, after the location's universe has
//! been resolved against the configured universes. A producer is either a
//! direct or a transitive dependency, never both. Each dependency may be
//! given an origin name, unique across the aggregate, that other parts of
//! the configuration use to refer to it.

use indexmap::IndexMap;
use tracing::debug;

use super::config::FeaturePackConfig;
use crate::config::{ConfigCustomizations, ConfigCustomizationsEdit};
use crate::error::{Error, Result};
use crate::location::{FeaturePackLocation, ProducerSpec, UniverseSpec};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePackDepsConfig {
    configs: ConfigCustomizations,
    direct: IndexMap<ProducerSpec, FeaturePackConfig>,
    transitive: IndexMap<ProducerSpec, FeaturePackConfig>,
    origins: IndexMap<String, ProducerSpec>,
    producer_origins: IndexMap<ProducerSpec, String>,
    default_universe: Option<UniverseSpec>,
    universes: IndexMap<String, UniverseSpec>,
}

fn kind(transitive: bool) -> &'static str {
    if transitive { "transitive" } else { "direct" }
}

impl FeaturePackDepsConfig {
    pub fn builder() -> FeaturePackDepsConfigBuilder {
        FeaturePackDepsConfigBuilder {
            deps: FeaturePackDepsConfig::default(),
        }
    }

    pub fn configs(&self) -> &ConfigCustomizations {
        &self.configs
    }

    pub(crate) fn configs_mut(&mut self) -> &mut ConfigCustomizations {
        &mut self.configs
    }

    /// Direct dependencies in insertion order
    pub fn feature_pack_deps(&self) -> impl Iterator<Item = &FeaturePackConfig> {
        self.direct.values()
    }

    pub fn transitive_deps(&self) -> impl Iterator<Item = &FeaturePackConfig> {
        self.transitive.values()
    }

    pub fn feature_pack_dep(&self, producer: &ProducerSpec) -> Option<&FeaturePackConfig> {
        self.direct.get(producer)
    }

    pub fn transitive_dep(&self, producer: &ProducerSpec) -> Option<&FeaturePackConfig> {
        self.transitive.get(producer)
    }

    pub fn has_feature_pack_deps(&self) -> bool {
        !self.direct.is_empty()
    }

    pub fn has_transitive_deps(&self) -> bool {
        !self.transitive.is_empty()
    }

    /// A dependency of either kind
    pub fn dep(&self, producer: &ProducerSpec) -> Option<&FeaturePackConfig> {
        self.direct
            .get(producer)
            .or_else(|| self.transitive.get(producer))
    }

    pub fn origin_of(&self, producer: &ProducerSpec) -> Option<&str> {
        self.producer_origins.get(producer).map(String::as_str)
    }

    pub fn dep_by_origin(&self, origin: &str) -> Result<&FeaturePackConfig> {
        self.origins
            .get(origin)
            .and_then(|producer| self.dep(producer))
            .ok_or_else(|| Error::resolution(format!("Unknown feature-pack origin {}", origin)))
    }

    /// Origin names and the producers they refer to
    pub fn origins(&self) -> impl Iterator<Item = (&str, &ProducerSpec)> {
        self.origins.iter().map(|(name, producer)| (name.as_str(), producer))
    }

    pub fn default_universe(&self) -> Option<&UniverseSpec> {
        self.default_universe.as_ref()
    }

    pub fn universes(&self) -> &IndexMap<String, UniverseSpec> {
        &self.universes
    }

    pub fn universe(&self, name: &str) -> Option<&UniverseSpec> {
        self.universes.get(name)
    }

    /// Substitute configured universes into a location
    ///
    /// A fully qualified universe is kept. A named reference is replaced by
    /// the spec configured under that name. A location without a universe
    /// gets the default universe when one is set.
    pub fn resolve_location(&self, location: &FeaturePackLocation) -> Result<FeaturePackLocation> {
        let universe = match location.universe() {
            Some(universe) => universe,
            None => match &self.default_universe {
                Some(default) => default,
                None => return Ok(location.clone()),
            },
        };
        if !universe.is_named_reference() {
            if location.universe().is_none() {
                debug!("using default universe {} for {}", universe, location);
                return Ok(location.replace_universe(Some(universe.clone())));
            }
            return Ok(location.clone());
        }
        let resolved = self.universes.get(universe.factory()).ok_or_else(|| {
            Error::description(format!(
                "Universe {} referenced by {} is not configured",
                universe.factory(),
                location
            ))
        })?;
        debug!("resolved universe {} to {} for {}", universe, resolved, location);
        Ok(location.replace_universe(Some(resolved.clone())))
    }
}

/// Dependency edits shared by the builders that own a dependency aggregate
pub trait FeaturePackDepsEdit {
    fn deps_mut(&mut self) -> &mut FeaturePackDepsConfig;

    fn set_default_universe(&mut self, universe: Option<UniverseSpec>) -> &mut Self
    where
        Self: Sized,
    {
        self.deps_mut().default_universe = universe;
        self
    }

    fn add_universe(&mut self, name: impl Into<String>, universe: UniverseSpec) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let name = name.into();
        let universes = &mut self.deps_mut().universes;
        if universes.contains_key(&name) {
            return Err(Error::description(format!(
                "Universe {} has already been configured",
                name
            )));
        }
        universes.insert(name, universe);
        Ok(self)
    }

    fn remove_universe(&mut self, name: &str) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.deps_mut()
            .universes
            .shift_remove(name)
            .ok_or_else(|| Error::resolution(format!("Universe {} is not configured", name)))?;
        Ok(self)
    }

    /// Add a dependency; its transitive flag decides which kind
    fn add_feature_pack_dep(&mut self, origin: Option<&str>, dep: FeaturePackConfig) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.add_feature_pack_dep_with(origin, dep, false)
    }

    /// Add a transitive dependency
    fn add_transitive_dep(&mut self, origin: Option<&str>, dep: FeaturePackConfig) -> Result<&mut Self>
    where
        Self: Sized,
    {
        if !dep.is_transitive() {
            return Err(Error::description(format!(
                "Feature-pack {} is not configured as a transitive dependency",
                dep.location()
            )));
        }
        self.add_feature_pack_dep_with(origin, dep, false)
    }

    /// Add a dependency, optionally replacing one for the same producer
    ///
    /// A replacement keeps its position and, when `origin` is `None`, its
    /// origin name. A different origin name moves the mapping.
    fn add_feature_pack_dep_with(
        &mut self,
        origin: Option<&str>,
        dep: FeaturePackConfig,
        replace: bool,
    ) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let deps = self.deps_mut();
        let location = deps.resolve_location(dep.location())?;
        let producer = location.producer();
        let transitive = dep.is_transitive();

        let (same, other) = if transitive {
            (&deps.transitive, &deps.direct)
        } else {
            (&deps.direct, &deps.transitive)
        };
        if other.contains_key(&producer) {
            return Err(Error::description(format!(
                "Feature-pack {} is already a {} dependency and cannot be added as a {} one",
                producer,
                kind(!transitive),
                kind(transitive)
            )));
        }
        let replacing = same.contains_key(&producer);
        if replacing && !replace {
            return Err(Error::description(format!(
                "Feature-pack {} has already been added as a {} dependency",
                producer,
                kind(transitive)
            )));
        }
        if let Some(origin) = origin {
            if let Some(owner) = deps.origins.get(origin) {
                if owner != &producer {
                    return Err(Error::description(format!(
                        "Duplicate feature-pack origin {} for {} and {}",
                        origin, owner, producer
                    )));
                }
            }
        }

        let dep = if &location != dep.location() {
            FeaturePackConfig::builder_from(&dep, location).build()
        } else {
            dep
        };
        if replacing {
            debug!("replacing {} dependency on {}", kind(transitive), producer);
        }
        let map = if transitive {
            &mut deps.transitive
        } else {
            &mut deps.direct
        };
        map.insert(producer.clone(), dep);

        if let Some(origin) = origin {
            if let Some(previous) = deps.producer_origins.get(&producer) {
                if previous != origin {
                    debug!("moving origin of {} from {} to {}", producer, previous, origin);
                    deps.origins.shift_remove(previous);
                }
            }
            deps.origins.insert(origin.to_string(), producer.clone());
            deps.producer_origins.insert(producer, origin.to_string());
        }
        Ok(self)
    }

    /// Remove a direct dependency; the location must match the stored
    /// channel and build
    fn remove_feature_pack_dep(&mut self, location: &FeaturePackLocation) -> Result<&mut Self>
    where
        Self: Sized,
    {
        remove_dep(self.deps_mut(), location, false)?;
        Ok(self)
    }

    fn remove_transitive_dep(&mut self, location: &FeaturePackLocation) -> Result<&mut Self>
    where
        Self: Sized,
    {
        remove_dep(self.deps_mut(), location, true)?;
        Ok(self)
    }
}

fn remove_dep(
    deps: &mut FeaturePackDepsConfig,
    location: &FeaturePackLocation,
    transitive: bool,
) -> Result<()> {
    let location = deps.resolve_location(location)?;
    let producer = location.producer();
    let map = if transitive {
        &mut deps.transitive
    } else {
        &mut deps.direct
    };

    let existing = map.get(&producer).ok_or_else(|| {
        Error::resolution(format!(
            "Feature-pack {} is not a {} dependency",
            producer,
            kind(transitive)
        ))
    })?;
    let stored = existing.location();
    if stored.channel_name() != location.channel_name() || stored.build() != location.build() {
        return Err(Error::resolution(format!(
            "Feature-pack location {} does not match the configured {}",
            location, stored
        )));
    }

    map.shift_remove(&producer);
    if let Some(origin) = deps.producer_origins.shift_remove(&producer) {
        deps.origins.shift_remove(&origin);
    }
    debug!("removed {} dependency on {}", kind(transitive), producer);
    Ok(())
}

/// Builds a standalone [`FeaturePackDepsConfig`]
#[derive(Debug, Clone, Default)]
pub struct FeaturePackDepsConfigBuilder {
    deps: FeaturePackDepsConfig,
}

impl FeaturePackDepsConfigBuilder {
    pub fn build(self) -> FeaturePackDepsConfig {
        self.deps
    }
}

impl FeaturePackDepsEdit for FeaturePackDepsConfigBuilder {
    fn deps_mut(&mut self) -> &mut FeaturePackDepsConfig {
        &mut self.deps
    }
}

impl ConfigCustomizationsEdit for FeaturePackDepsConfigBuilder {
    fn customizations_mut(&mut self) -> &mut ConfigCustomizations {
        self.deps.configs_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fpl(s: &str) -> FeaturePackLocation {
        s.parse().unwrap()
    }

    fn direct(s: &str) -> FeaturePackConfig {
        FeaturePackConfig::builder(fpl(s)).build()
    }

    fn transitive(s: &str) -> FeaturePackConfig {
        FeaturePackConfig::transitive_builder(fpl(s)).build()
    }

    #[test]
    fn test_direct_and_transitive_are_exclusive() {
        let mut builder = FeaturePackDepsConfig::builder();
        builder
            .add_transitive_dep(None, transitive("core@u(r):1.x#1.0"))
            .unwrap();
        let err = builder
            .add_feature_pack_dep(None, direct("core@u(r):1.x#1.0"))
            .unwrap_err();
        assert!(err.is_description());

        let mut builder = FeaturePackDepsConfig::builder();
        builder.add_feature_pack_dep(None, direct("core@u(r):1.x#1.0")).unwrap();
        assert!(builder
            .add_transitive_dep(None, transitive("core@u(r):1.x#1.0"))
            .is_err());
        assert!(builder.add_transitive_dep(None, direct("other@u(r)")).is_err());
    }

    #[test]
    fn test_default_and_named_universes() {
        let mut builder = FeaturePackDepsConfig::builder();
        builder
            .set_default_universe(Some(UniverseSpec::new("maven", "org:universe")))
            .add_universe("community", UniverseSpec::new("maven", "org:community"))
            .unwrap()
            .add_feature_pack_dep(None, direct("core:1.x#1.0"))
            .unwrap()
            .add_feature_pack_dep(None, direct("web@community:1.x#1.0"))
            .unwrap()
            .add_feature_pack_dep(None, direct("db@other(x):1.x#1.0"))
            .unwrap();
        assert!(builder
            .add_feature_pack_dep(None, direct("misc@nowhere:1.x"))
            .unwrap_err()
            .is_description());

        let deps = builder.build();
        let locations: Vec<String> = deps
            .feature_pack_deps()
            .map(|d| d.location().to_string())
            .collect();
        assert_eq!(
            locations,
            vec![
                "core@maven(org:universe):1.x#1.0",
                "web@maven(org:community):1.x#1.0",
                "db@other(x):1.x#1.0",
            ]
        );
    }

    #[test]
    fn test_replace_existing_version() {
        let mut builder = FeaturePackDepsConfig::builder();
        builder
            .add_feature_pack_dep(Some("core"), direct("core@u(r):1.x#1.0"))
            .unwrap()
            .add_feature_pack_dep(None, direct("web@u(r):1.x#1.0"))
            .unwrap();
        assert!(builder
            .add_feature_pack_dep(None, direct("core@u(r):1.x#2.0"))
            .is_err());

        builder
            .add_feature_pack_dep_with(None, direct("core@u(r):1.x#2.0"), true)
            .unwrap();
        let deps = builder.clone().build();
        let producer = fpl("core@u(r)").producer();
        assert_eq!(deps.origin_of(&producer), Some("core"));
        assert_eq!(deps.dep_by_origin("core").unwrap().location().build(), Some("2.0"));
        assert_eq!(
            deps.feature_pack_deps().next().unwrap().location().producer_name(),
            "core"
        );

        builder
            .add_feature_pack_dep_with(Some("main"), direct("core@u(r):1.x#3.0"), true)
            .unwrap();
        let deps = builder.build();
        assert_eq!(deps.origin_of(&producer), Some("main"));
        assert!(deps.dep_by_origin("core").unwrap_err().is_resolution());
        assert_eq!(deps.origins().count(), 1);
    }

    #[test]
    fn test_duplicate_origin() {
        let mut builder = FeaturePackDepsConfig::builder();
        builder
            .add_feature_pack_dep(Some("x"), direct("core@u(r):1.x#1.0"))
            .unwrap();
        let err = builder
            .add_feature_pack_dep(Some("x"), direct("web@u(r):1.x#1.0"))
            .unwrap_err();
        assert!(err.is_description());
        assert!(!builder.build().has_transitive_deps());
    }

    #[test]
    fn test_remove_requires_matching_location() {
        let mut builder = FeaturePackDepsConfig::builder();
        builder
            .add_feature_pack_dep(Some("core"), direct("core@u(r):1.x#1.0"))
            .unwrap();

        let err = builder
            .remove_feature_pack_dep(&fpl("core@u(r):1.x#2.0"))
            .unwrap_err();
        assert!(err.is_resolution());
        assert!(builder
            .remove_feature_pack_dep(&fpl("core@u(r):2.x#1.0"))
            .is_err());
        assert!(builder
            .remove_feature_pack_dep(&fpl("ghost@u(r):1.x#1.0"))
            .unwrap_err()
            .is_resolution());
        assert!(builder
            .remove_transitive_dep(&fpl("core@u(r):1.x#1.0"))
            .is_err());

        builder
            .remove_feature_pack_dep(&fpl("core@u(r):1.x#1.0"))
            .unwrap();
        let deps = builder.build();
        assert!(!deps.has_feature_pack_deps());
        assert_eq!(deps.origins().count(), 0);
    }
}
