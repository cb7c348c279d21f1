//! Offline patchbay backed by a dumped snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use jackpatch_core::{Patchbay, RawGraph, TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BusResult;

/// A graph snapshot together with the PIDs of its clients.
///
/// This is the JSON format written by `jackpatch dump`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub graph: RawGraph,
    /// Client ID -> process ID
    #[serde(default)]
    pub pids: BTreeMap<u64, i64>,
}

impl SnapshotDocument {
    /// Record the current state of a patchbay.
    ///
    /// # Errors
    /// Returns an error if any patchbay call fails.
    pub fn capture<P: Patchbay + ?Sized>(patchbay: &P) -> TransportResult<Self> {
        let graph = patchbay.get_graph(0)?;
        let pids = graph
            .clients
            .iter()
            .map(|c| patchbay.client_pid(c.id).map(|pid| (c.id, pid)))
            .collect::<TransportResult<_>>()?;
        Ok(Self { graph, pids })
    }
}

/// Read-only patchbay serving a [`SnapshotDocument`].
///
/// Connect and disconnect requests fail with [`TransportError::ReadOnly`].
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    document: SnapshotDocument,
    path: Option<PathBuf>,
}

impl SnapshotFile {
    /// Load a snapshot from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a snapshot
    /// document, or violates the snapshot invariants.
    pub fn load(path: &Path) -> BusResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let document: SnapshotDocument = serde_json::from_str(&content)?;
        document.graph.validate()?;
        info!(?path, clients = document.graph.clients.len(), "Loaded snapshot");
        Ok(Self { document, path: Some(path.to_path_buf()) })
    }

    /// Serve an in-memory document.
    #[must_use]
    pub fn from_document(document: SnapshotDocument) -> Self {
        Self { document, path: None }
    }

    /// File the snapshot was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn document(&self) -> &SnapshotDocument {
        &self.document
    }
}

impl Patchbay for SnapshotFile {
    fn get_graph(&self, _known_version: u64) -> TransportResult<RawGraph> {
        Ok(self.document.graph.clone())
    }

    fn client_pid(&self, client_id: u64) -> TransportResult<i64> {
        self.document.pids.get(&client_id).copied().ok_or_else(|| {
            TransportError::method_failed("GetClientPID", format!("unknown client id {client_id}"))
        })
    }

    fn connect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()> {
        debug!(%source_client, %source_port, %dest_client, %dest_port, "Refusing connect on snapshot");
        Err(TransportError::ReadOnly)
    }

    fn disconnect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()> {
        debug!(%source_client, %source_port, %dest_client, %dest_port, "Refusing disconnect on snapshot");
        Err(TransportError::ReadOnly)
    }
}
