//! Error types for the population psychology engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of entity a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Profile,
    Incentive,
    Group,
    Policy,
    Model,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Profile => "Profile",
            EntityKind::Incentive => "Incentive",
            EntityKind::Group => "Group",
            EntityKind::Policy => "Policy",
            EntityKind::Model => "Model",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    #[error("Unknown model type: {0}")]
    UnknownModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Computation failed for {item}: {reason}")]
    PartialComputation { item: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True for errors caused by malformed input rather than missing state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::UnknownArchetype(_) | Error::UnknownModel(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found(EntityKind::Profile, "abc");
        assert_eq!(err.to_string(), "Profile not found: abc");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::UnknownArchetype("Wizard".into()).is_validation());
        assert!(Error::UnknownModel("magic".into()).is_validation());
        assert!(!Error::Config("bad".into()).is_validation());
    }
}
