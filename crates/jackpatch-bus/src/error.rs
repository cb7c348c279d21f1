//! Bus error types.

use thiserror::Error;

/// Error setting up a patchbay.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Snapshot(#[from] jackpatch_core::Error),

    #[error(transparent)]
    Transport(#[from] jackpatch_core::TransportError),
}

/// Result type for bus setup.
pub type BusResult<T> = Result<T, BusError>;
