// src/location/fpl.rs

//! Feature-pack location parsing

use std::fmt;
use std::str::FromStr;

use super::universe::UniverseSpec;
use crate::error::{Error, Result};

/// The stable identity of a feature-pack across versions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProducerSpec {
    universe: Option<UniverseSpec>,
    name: String,
}

impl ProducerSpec {
    pub fn new(name: impl Into<String>, universe: Option<UniverseSpec>) -> Self {
        Self {
            universe,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> Option<&UniverseSpec> {
        self.universe.as_ref()
    }
}

impl fmt::Display for ProducerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.universe {
            Some(universe) => write!(f, "{}@{}", self.name, universe),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A producer's release channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelSpec {
    producer: ProducerSpec,
    name: String,
}

impl ChannelSpec {
    pub fn producer(&self) -> &ProducerSpec {
        &self.producer
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ChannelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.producer, self.name)
    }
}

/// Where a feature-pack comes from: producer, universe, channel and build
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeaturePackLocation {
    universe: Option<UniverseSpec>,
    producer: String,
    channel: Option<String>,
    frequency: Option<String>,
    build: Option<String>,
}

impl FeaturePackLocation {
    pub fn new(
        universe: Option<UniverseSpec>,
        producer: impl Into<String>,
        channel: Option<String>,
        frequency: Option<String>,
        build: Option<String>,
    ) -> Self {
        Self {
            universe,
            producer: producer.into(),
            channel,
            frequency,
            build,
        }
    }

    /// Parse `producer[@universe][:channel[/frequency]][#build]`
    pub fn parse(s: &str) -> Result<Self> {
        Parser::new(s).location()
    }

    pub fn producer_name(&self) -> &str {
        &self.producer
    }

    pub fn universe(&self) -> Option<&UniverseSpec> {
        self.universe.as_ref()
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn frequency(&self) -> Option<&str> {
        self.frequency.as_deref()
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn has_build(&self) -> bool {
        self.build.is_some()
    }

    /// The producer this location points at
    pub fn producer(&self) -> ProducerSpec {
        ProducerSpec::new(self.producer.clone(), self.universe.clone())
    }

    pub fn channel(&self) -> Option<ChannelSpec> {
        self.channel.as_ref().map(|name| ChannelSpec {
            producer: self.producer(),
            name: name.clone(),
        })
    }

    /// The exact build this location names, if it names one
    pub fn fpid(&self) -> Option<Fpid> {
        self.build.as_ref()?;
        Some(Fpid(Self {
            frequency: None,
            ..self.clone()
        }))
    }

    /// The same location in another universe
    pub fn replace_universe(&self, universe: Option<UniverseSpec>) -> Self {
        Self {
            universe,
            ..self.clone()
        }
    }

    /// The same location pinned to another build
    pub fn replace_build(&self, build: impl Into<String>) -> Self {
        Self {
            build: Some(build.into()),
            ..self.clone()
        }
    }
}

impl fmt::Display for FeaturePackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.producer)?;
        if let Some(universe) = &self.universe {
            write!(f, "@{}", universe)?;
        }
        if let Some(channel) = &self.channel {
            write!(f, ":{}", channel)?;
            if let Some(frequency) = &self.frequency {
                write!(f, "/{}", frequency)?;
            }
        }
        if let Some(build) = &self.build {
            write!(f, "#{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for FeaturePackLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A feature-pack location that names an exact build
///
/// The frequency is dropped: two locations for the same build are the same
/// feature-pack regardless of how often their channel is followed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fpid(FeaturePackLocation);

impl Fpid {
    pub fn parse(s: &str) -> Result<Self> {
        FeaturePackLocation::parse(s)?
            .fpid()
            .ok_or_else(|| Error::InvalidLocation(format!("{} does not name a build", s)))
    }

    pub fn location(&self) -> &FeaturePackLocation {
        &self.0
    }

    pub fn producer(&self) -> ProducerSpec {
        self.0.producer()
    }

    pub fn build(&self) -> &str {
        self.0.build().unwrap_or_default()
    }
}

impl fmt::Display for Fpid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Fpid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, reason: &str) -> Error {
        Error::InvalidLocation(format!("{} ({})", self.input, reason))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consume up to (not including) the first of `stops`
    fn take_until(&mut self, stops: &[char]) -> &'a str {
        let rest = &self.input[self.pos..];
        let end = rest.find(|c| stops.contains(&c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn required_part(&mut self, stops: &[char], what: &str) -> Result<String> {
        let part = self.take_until(stops);
        if part.is_empty() {
            return Err(self.error(&format!("empty {}", what)));
        }
        Ok(part.to_string())
    }

    fn universe(&mut self) -> Result<UniverseSpec> {
        let rest = &self.input[self.pos..];
        let paren = rest.find('(');
        let boundary = rest.find([':', '#']).unwrap_or(rest.len());

        let text = match paren {
            Some(open) if open < boundary => {
                let mut depth = 0usize;
                let mut close = None;
                for (i, c) in rest.char_indices().skip(open) {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                close = Some(i);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let close = close.ok_or_else(|| self.error("unbalanced universe location"))?;
                &rest[..=close]
            }
            _ => &rest[..boundary],
        };
        self.pos += text.len();
        UniverseSpec::parse(text).map_err(|_| self.error("malformed universe"))
    }

    fn location(mut self) -> Result<FeaturePackLocation> {
        if self.input.chars().any(char::is_whitespace) {
            return Err(self.error("whitespace"));
        }

        let producer = self.required_part(&['@', ':', '#'], "producer")?;

        let universe = if self.peek() == Some('@') {
            self.pos += 1;
            Some(self.universe()?)
        } else {
            None
        };

        let mut channel = None;
        let mut frequency = None;
        if self.peek() == Some(':') {
            self.pos += 1;
            channel = Some(self.required_part(&['/', '#'], "channel")?);
            if self.peek() == Some('/') {
                self.pos += 1;
                frequency = Some(self.required_part(&['#'], "frequency")?);
            }
        }

        let build = if self.peek() == Some('#') {
            self.pos += 1;
            Some(self.required_part(&[], "build")?)
        } else {
            None
        };

        if self.pos != self.input.len() {
            return Err(self.error("unexpected trailing characters"));
        }

        Ok(FeaturePackLocation {
            universe,
            producer,
            channel,
            frequency,
            build,
        })
    }
}
