// src/layers/directive.rs

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single layer edit: `name` includes, `-name` excludes, `+name` lifts a
/// previous exclusion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerDirective {
    Include(String),
    Exclude(String),
    Unexclude(String),
}

impl LayerDirective {
    pub fn parse(s: &str) -> Result<Self> {
        let (make, name): (fn(String) -> Self, &str) = match s.as_bytes().first() {
            Some(b'-') => (Self::Exclude, &s[1..]),
            Some(b'+') => (Self::Unexclude, &s[1..]),
            _ => (Self::Include, s),
        };
        if name.is_empty()
            || name.starts_with(['-', '+'])
            || name.chars().any(char::is_whitespace)
        {
            return Err(Error::description(format!("Invalid layer directive '{}'", s)));
        }
        Ok(make(name.to_string()))
    }

    pub fn layer(&self) -> &str {
        match self {
            Self::Include(name) | Self::Exclude(name) | Self::Unexclude(name) => name,
        }
    }
}

impl fmt::Display for LayerDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include(name) => f.write_str(name),
            Self::Exclude(name) => write!(f, "-{}", name),
            Self::Unexclude(name) => write!(f, "+{}", name),
        }
    }
}

impl FromStr for LayerDirective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
