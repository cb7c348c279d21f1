//! Error types for jackpatch core.

use thiserror::Error;

use crate::dispatch::ActionError;
use crate::patchbay::TransportError;

/// Core error type for jackpatch operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Action failed: {0}")]
    Action(#[from] ActionError),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSnapshot(message.into())
    }
}

/// Result type alias for jackpatch core operations.
pub type Result<T> = std::result::Result<T, Error>;
