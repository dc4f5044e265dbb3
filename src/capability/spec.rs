// src/capability/spec.rs
//! Capability expression parsing

use std::fmt;
use std::str::FromStr;

use super::resolver::CapabilityResolver;
use crate::error::{Error, Result};

/// One segment of a capability expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Literal text, may itself contain dots
    Static(String),
    /// Name resolved at match time (written with a leading `$`)
    Dynamic(String),
}

impl Segment {
    pub fn value(&self) -> &str {
        match self {
            Segment::Static(v) | Segment::Dynamic(v) => v,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Segment::Static(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(v) => write!(f, "{}", v),
            Segment::Dynamic(v) => write!(f, "${}", v),
        }
    }
}

/// A parsed capability expression
///
/// Adjacent static text is kept in one segment, so `a.b.$c.d` has the
/// segments `a.b`, `$c` and `d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilitySpec {
    segments: Vec<Segment>,
    optional: bool,
}

impl CapabilitySpec {
    /// Parse `[$]segment[.[$]segment]*`
    ///
    /// A `$` is only accepted as the first character or right after a dot.
    /// Whitespace and empty segments are rejected. A fully static expression
    /// cannot be optional.
    pub fn parse(expr: &str, optional: bool) -> Result<Self> {
        if expr.is_empty() {
            return Err(Error::description("Capability expression is empty"));
        }

        let format_error = |position: usize, reason: &str| Error::CapabilityFormat {
            expr: expr.to_string(),
            position,
            reason: reason.to_string(),
        };

        let chars: Vec<char> = expr.chars().collect();
        let mut segments = Vec::new();
        let mut buf = String::new();
        let mut is_static = true;

        for (i, &ch) in chars.iter().enumerate() {
            match ch {
                '$' => {
                    if i > 0 && chars[i - 1] != '.' {
                        return Err(format_error(i, "'$' must start a segment"));
                    }
                    is_static = false;
                }
                '.' => {
                    if buf.is_empty() || chars[i - 1] == '.' {
                        return Err(format_error(i, "Empty segment"));
                    }
                    let continues_literal = chars.get(i + 1).is_some_and(|next| *next != '$');
                    if is_static && continues_literal {
                        buf.push('.');
                    } else {
                        segments.push(make_segment(std::mem::take(&mut buf), is_static));
                        is_static = true;
                    }
                }
                c if c.is_whitespace() => {
                    return Err(format_error(
                        i,
                        "Whitespace is not allowed in a capability expression",
                    ));
                }
                c => buf.push(c),
            }
        }

        if buf.is_empty() {
            return Err(format_error(chars.len(), "Empty segment"));
        }
        segments.push(make_segment(buf, is_static));

        if optional && segments.iter().all(Segment::is_static) {
            return Err(Error::description(format!(
                "Static capability cannot be optional: {}",
                expr
            )));
        }

        Ok(Self { segments, optional })
    }

    /// Parse a required (non-optional) capability
    pub fn required(expr: &str) -> Result<Self> {
        Self::parse(expr, false)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// True when no segment needs resolving
    pub fn is_static(&self) -> bool {
        self.segments.iter().all(Segment::is_static)
    }

    /// Match the expression segment by segment
    ///
    /// Segments are handed to the resolver left to right; the first segment
    /// it rejects ends the match. Not matching is a normal outcome, not an
    /// error.
    pub fn resolve<R>(&self, resolver: &mut R) -> bool
    where
        R: CapabilityResolver + ?Sized,
    {
        self.segments
            .iter()
            .all(|segment| resolver.resolve_element(segment.value(), segment.is_static()))
    }
}

fn make_segment(value: String, is_static: bool) -> Segment {
    if is_static {
        Segment::Static(value)
    } else {
        Segment::Dynamic(value)
    }
}

impl fmt::Display for CapabilitySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for CapabilitySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::required(s)
    }
}
