// src/spec/id.rs

//! Spec and feature identities

use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

/// The name of a feature spec
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecId(String);

impl SpecId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpecId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SpecId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The identity of a single feature: its spec plus the values of the spec's
/// id parameters
///
/// Rendered as `spec:p1=v1,p2=v2` with parameters in insertion order. Two ids
/// with the same parameter values in a different order are equal.
#[derive(Debug, Clone)]
pub struct FeatureId {
    spec: SpecId,
    params: IndexMap<String, String>,
}

impl FeatureId {
    /// An id with a single parameter
    pub fn new(spec: impl Into<SpecId>, param: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = IndexMap::new();
        params.insert(param.into(), value.into());
        Self {
            spec: spec.into(),
            params,
        }
    }

    /// An id from parameter/value pairs, in the order given
    pub fn from_params<I, K, V>(spec: impl Into<SpecId>, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let spec = spec.into();
        let mut map = IndexMap::new();
        for (name, value) in params {
            let name = name.into();
            if map.insert(name.clone(), value.into()).is_some() {
                return Err(Error::InvalidId(format!(
                    "duplicate parameter {} for {}",
                    name, spec
                )));
            }
        }
        if map.is_empty() {
            return Err(Error::InvalidId(format!(
                "{} has no id parameters",
                spec
            )));
        }
        Ok(Self { spec, params: map })
    }

    /// Parse `spec:p1=v1,p2=v2`
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidId(s.to_string());

        let (spec, params) = s.split_once(':').ok_or_else(invalid)?;
        if spec.is_empty() || params.is_empty() {
            return Err(invalid());
        }

        let mut pairs = Vec::new();
        for pair in params.split(',') {
            let (name, value) = pair.split_once('=').ok_or_else(invalid)?;
            if name.is_empty() || value.is_empty() {
                return Err(invalid());
            }
            pairs.push((name, value));
        }
        Self::from_params(spec, pairs)
    }

    pub fn spec(&self) -> &SpecId {
        &self.spec
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl PartialEq for FeatureId {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec && self.params == other.params
    }
}

impl Eq for FeatureId {}

impl Hash for FeatureId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.spec.hash(state);
        let mut entries: Vec<(&String, &String)> = self.params.iter().collect();
        entries.sort();
        entries.hash(state);
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.spec)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl FromStr for FeatureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_and_render() {
        let id = FeatureId::parse("interface:name=public,host=main").unwrap();
        assert_eq!(id.spec().name(), "interface");
        assert_eq!(id.param("host"), Some("main"));
        assert_eq!(id.to_string(), "interface:name=public,host=main");
    }

    #[test]
    fn test_order_insensitive_identity() {
        let a = FeatureId::parse("s:a=1,b=2").unwrap();
        let b = FeatureId::parse("s:b=2,a=1").unwrap();
        assert_eq!(a, b);

        let set: HashSet<FeatureId> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_ids() {
        for s in ["", "spec", "spec:", ":a=1", "spec:a", "spec:a=", "spec:=1", "spec:a=1,a=2"] {
            assert!(
                matches!(FeatureId::parse(s), Err(Error::InvalidId(_))),
                "{} should be rejected",
                s
            );
        }
    }

    #[test]
    fn test_from_params_requires_one() {
        let empty: Vec<(String, String)> = Vec::new();
        assert!(FeatureId::from_params("s", empty).is_err());
    }
}
