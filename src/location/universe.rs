// src/location/universe.rs

//! Universe specs

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A universe: `factory(location)`, or a bare name referencing one
/// configured elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniverseSpec {
    factory: String,
    location: Option<String>,
}

impl UniverseSpec {
    /// A fully qualified universe
    pub fn new(factory: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            factory: factory.into(),
            location: Some(location.into()),
        }
    }

    /// A reference to a universe configured under `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            factory: name.into(),
            location: None,
        }
    }

    /// Parse `factory(location)` or a bare universe name
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::description(format!("Invalid universe spec: {}", s));

        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        match s.find('(') {
            None => {
                if s.contains(')') {
                    return Err(invalid());
                }
                Ok(Self::named(s))
            }
            Some(open) => {
                let factory = &s[..open];
                let location = s[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
                if factory.is_empty() || location.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::new(factory, location))
            }
        }
    }

    pub fn factory(&self) -> &str {
        &self.factory
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// True for a bare name that still has to be looked up
    pub fn is_named_reference(&self) -> bool {
        self.location.is_none()
    }
}

impl fmt::Display for UniverseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}({})", self.factory, location),
            None => write!(f, "{}", self.factory),
        }
    }
}

impl FromStr for UniverseSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
