// src/selection.rs

//! Mutually exclusive include/exclude selections
//!
//! Specs, features, config models, configs, packages and layers are all
//! selected through a pair of disjoint collections: what was explicitly
//! included and what was explicitly excluded. [`Selection`] keeps the pair
//! and refuses an insert into one side while the key sits in the other.
//!
//! Each side carries an optional payload: an override body for included
//! features, a parent reference for excluded features, the
//! "named configs only" flag for excluded models. Plain name sets use `()`.

use indexmap::{Equivalent, IndexMap};
use std::fmt;
use std::hash::Hash;

use crate::error::Error;

/// Which side of a selection a key sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Included,
    Excluded,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Included => write!(f, "included"),
            Side::Excluded => write!(f, "excluded"),
        }
    }
}

/// An insert was refused because the key is on the opposite side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub existing: Side,
}

impl Conflict {
    /// Turn the conflict into a description error naming the offending key
    pub fn describe(self, what: &str, key: impl fmt::Display) -> Error {
        Error::description(format!(
            "{} {} has been explicitly {}",
            what, key, self.existing
        ))
    }
}

/// Two disjoint keyed collections: explicitly included and explicitly excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Hash + Eq, I = (), E = ()> {
    included: IndexMap<K, I>,
    excluded: IndexMap<K, E>,
}

impl<K: Hash + Eq, I, E> Default for Selection<K, I, E> {
    fn default() -> Self {
        Self {
            included: IndexMap::new(),
            excluded: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, I, E> Selection<K, I, E> {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Include a key, replacing the payload of an earlier inclusion
    ///
    /// Fails without touching the selection if the key is excluded.
    pub fn include(&mut self, key: K, value: I) -> Result<Option<I>, Conflict> {
        if self.excluded.contains_key(&key) {
            return Err(Conflict {
                existing: Side::Excluded,
            });
        }
        Ok(self.included.insert(key, value))
    }

    /// Exclude a key, replacing the payload of an earlier exclusion
    ///
    /// Fails without touching the selection if the key is included.
    pub fn exclude(&mut self, key: K, value: E) -> Result<Option<E>, Conflict> {
        if self.included.contains_key(&key) {
            return Err(Conflict {
                existing: Side::Included,
            });
        }
        Ok(self.excluded.insert(key, value))
    }

    /// Drop an inclusion, keeping the order of the remaining entries
    pub fn remove_included<Q>(&mut self, key: &Q) -> Option<I>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.included.shift_remove(key)
    }

    /// Drop an exclusion, keeping the order of the remaining entries
    pub fn remove_excluded<Q>(&mut self, key: &Q) -> Option<E>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.excluded.shift_remove(key)
    }

    pub fn is_included<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.included.contains_key(key)
    }

    pub fn is_excluded<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.excluded.contains_key(key)
    }

    /// Payload recorded with an inclusion
    pub fn included_value<Q>(&self, key: &Q) -> Option<&I>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.included.get(key)
    }

    /// Payload recorded with an exclusion
    pub fn excluded_value<Q>(&self, key: &Q) -> Option<&E>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.excluded.get(key)
    }

    /// Which side a key is on, if any
    pub fn side_of<Q>(&self, key: &Q) -> Option<Side>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        if self.included.contains_key(key) {
            Some(Side::Included)
        } else if self.excluded.contains_key(key) {
            Some(Side::Excluded)
        } else {
            None
        }
    }

    /// Included entries in insertion order
    pub fn included(&self) -> &IndexMap<K, I> {
        &self.included
    }

    /// Excluded entries in insertion order
    pub fn excluded(&self) -> &IndexMap<K, E> {
        &self.excluded
    }

    pub fn has_included(&self) -> bool {
        !self.included.is_empty()
    }

    pub fn has_excluded(&self) -> bool {
        !self.excluded.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_then_exclude_conflicts() {
        let mut sel: Selection<String> = Selection::new();
        sel.include("a".to_string(), ()).unwrap();
        let err = sel.exclude("a".to_string(), ()).unwrap_err();
        assert_eq!(err.existing, Side::Included);
        assert!(sel.is_included("a"));
        assert!(!sel.is_excluded("a"));
    }

    #[test]
    fn test_exclude_then_include_conflicts() {
        let mut sel: Selection<String> = Selection::new();
        sel.exclude("a".to_string(), ()).unwrap();
        let err = sel.include("a".to_string(), ()).unwrap_err();
        assert_eq!(err.existing, Side::Excluded);
        assert_eq!(sel.side_of("a"), Some(Side::Excluded));
    }

    #[test]
    fn test_payload_replacement_keeps_position() {
        let mut sel: Selection<String, u32, bool> = Selection::new();
        sel.include("a".to_string(), 1).unwrap();
        sel.include("b".to_string(), 2).unwrap();
        assert_eq!(sel.include("a".to_string(), 3).unwrap(), Some(1));
        let keys: Vec<&String> = sel.included().keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(sel.included_value("a"), Some(&3));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut sel: Selection<String> = Selection::new();
        for name in ["a", "b", "c"] {
            sel.exclude(name.to_string(), ()).unwrap();
        }
        assert!(sel.remove_excluded("b").is_some());
        assert!(sel.remove_excluded("b").is_none());
        let keys: Vec<&String> = sel.excluded().keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_conflict_message() {
        let err = Conflict {
            existing: Side::Excluded,
        }
        .describe("Package", "docs");
        assert_eq!(err.to_string(), "Package docs has been explicitly excluded");
    }
}
