// src/capability/resolver.rs
//! Capability segment resolution

use indexmap::IndexMap;

/// Resolves capability expression segments one at a time
///
/// Implementations are called once per segment, left to right, and may stop
/// the match by returning `false`.
pub trait CapabilityResolver {
    fn resolve_element(&mut self, segment: &str, is_static: bool) -> bool;
}

impl<F> CapabilityResolver for F
where
    F: FnMut(&str, bool) -> bool,
{
    fn resolve_element(&mut self, segment: &str, is_static: bool) -> bool {
        self(segment, is_static)
    }
}

/// Resolves dynamic segments from a feature's parameter values
///
/// The concrete capability name is assembled while matching; it is only
/// meaningful after a successful match.
#[derive(Debug)]
pub struct ParamsResolver<'a> {
    params: &'a IndexMap<String, String>,
    resolved: String,
}

impl<'a> ParamsResolver<'a> {
    pub fn new(params: &'a IndexMap<String, String>) -> Self {
        Self {
            params,
            resolved: String::new(),
        }
    }

    /// The capability name built so far
    pub fn resolved(&self) -> &str {
        &self.resolved
    }

    pub fn into_resolved(self) -> String {
        self.resolved
    }

    fn append(&mut self, value: &str) {
        if !self.resolved.is_empty() {
            self.resolved.push('.');
        }
        self.resolved.push_str(value);
    }
}

impl CapabilityResolver for ParamsResolver<'_> {
    fn resolve_element(&mut self, segment: &str, is_static: bool) -> bool {
        if is_static {
            self.append(segment);
            return true;
        }
        match self.params.get(segment) {
            Some(value) if !value.is_empty() => {
                let value = value.clone();
                self.append(&value);
                true
            }
            _ => false,
        }
    }
}
