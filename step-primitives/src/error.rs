//! Shared error definitions for descriptor and capability primitives.

use thiserror::Error;

/// Result alias used throughout the primitive types.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// Tool or operation descriptor failed validation.
    #[error("invalid descriptor: {reason}")]
    InvalidDescriptor {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Capability definition failed validation.
    #[error("invalid capability: {reason}")]
    InvalidCapability {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl Error {
    /// Convenience constructor for descriptor validation failures.
    #[must_use]
    pub fn invalid_descriptor(reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for capability validation failures.
    #[must_use]
    pub fn invalid_capability(reason: impl Into<String>) -> Self {
        Self::InvalidCapability {
            reason: reason.into(),
        }
    }
}
