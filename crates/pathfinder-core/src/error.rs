//! Error types for Pathfinder Core

use thiserror::Error;

use crate::limits::ValidationError;

/// Result type alias using Pathfinder's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pathfinder error types
///
/// An empty path set is never an error. These variants describe requests
/// that are malformed, so callers can tell them apart from unreachability.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid {argument} identifier: {reason}")]
    InvalidIdentifier { argument: String, reason: String },

    #[error("Invalid constraint '{key}': {reason}")]
    InvalidConstraint { key: String, reason: String },

    #[error("Invalid link {link}: {reason}")]
    InvalidLink { link: String, reason: String },

    #[error("Link {link} references unknown interface: {interface}")]
    UnknownEndpoint { link: String, interface: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    pub(crate) fn identifier(argument: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn constraint(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
