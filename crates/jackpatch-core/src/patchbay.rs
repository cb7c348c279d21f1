//! The patchbay collaborator.
//!
//! Everything the core needs from a running JACK server goes through
//! [`Patchbay`]. Implementations must be blocking; the core issues calls
//! strictly one after another.

use thiserror::Error;

use crate::snapshot::RawGraph;

/// Transport-level failure talking to the patchbay.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Patchbay unavailable: {0}")]
    Unavailable(String),

    #[error("{method} failed: {message}")]
    MethodFailed { method: String, message: String },

    #[error("Could not decode reply: {0}")]
    Decode(String),

    #[error("Patchbay is read-only")]
    ReadOnly,
}

impl TransportError {
    /// Build a [`TransportError::MethodFailed`].
    pub fn method_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MethodFailed { method: method.into(), message: message.into() }
    }
}

/// Result type for patchbay calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Remote procedures exposed by `org.jackaudio.JackPatchbay`.
#[cfg_attr(test, mockall::automock)]
pub trait Patchbay {
    /// `GetGraph`: fetch the current graph. `known_version` 0 always returns
    /// a full snapshot.
    ///
    /// # Errors
    /// Returns an error if the call fails or the reply cannot be decoded.
    fn get_graph(&self, known_version: u64) -> TransportResult<RawGraph>;

    /// `GetClientPID`: resolve the process ID of a client.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    fn client_pid(&self, client_id: u64) -> TransportResult<i64>;

    /// `ConnectPortsByName`.
    ///
    /// # Errors
    /// Returns an error if the server refuses or the call fails.
    fn connect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()>;

    /// `DisconnectPortsByName`.
    ///
    /// # Errors
    /// Returns an error if the server refuses or the call fails.
    fn disconnect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()>;
}
