// src/error.rs

//! Error types shared by the whole configuration model
//!
//! Errors come in two kinds:
//!
//! - **Description** errors: the configuration is malformed or contradicts
//!   itself (duplicate names, conflicting include/exclude, bad syntax).
//! - **Resolution** errors: the configuration is well formed but an operation
//!   refers to state that is not present (unknown producer, origin or layer,
//!   a location that does not match what is stored).
//!
//! Both are raised by the builder call that introduces the problem. A failed
//! call leaves the builder untouched.

use thiserror::Error;

/// Errors raised by the configuration model and its resolvers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or self-contradictory configuration
    #[error("{0}")]
    Description(String),

    /// Capability expression syntax error
    #[error("{reason} at position {position} of capability expression '{expr}'")]
    CapabilityFormat {
        expr: String,
        position: usize,
        reason: String,
    },

    /// Feature id string could not be parsed
    #[error("Invalid feature id: {0}")]
    InvalidId(String),

    /// Feature-pack location string could not be parsed
    #[error("Invalid feature-pack location: {0}")]
    InvalidLocation(String),

    /// Operation refers to state that is absent from the aggregate
    #[error("{0}")]
    Resolution(String),
}

impl Error {
    /// Shorthand for a description error
    pub(crate) fn description(msg: impl Into<String>) -> Self {
        Error::Description(msg.into())
    }

    /// Shorthand for a resolution error
    pub(crate) fn resolution(msg: impl Into<String>) -> Self {
        Error::Resolution(msg.into())
    }

    /// True for malformed or contradictory configuration
    pub fn is_description(&self) -> bool {
        !self.is_resolution()
    }

    /// True for operations on state the aggregate does not contain
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution(_))
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, Error>;
