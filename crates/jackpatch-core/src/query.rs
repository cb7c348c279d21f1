//! Fresh reads of the JACK graph.

use tracing::debug;

use crate::client::Client;
use crate::connection::Connection;
use crate::error::Result;
use crate::graph::Graph;
use crate::patchbay::Patchbay;
use crate::pattern::NamePattern;
use crate::port::Port;

/// Graph version passed to `GetGraph`; 0 always yields a full snapshot.
const FULL_SNAPSHOT: u64 = 0;

/// Reads the graph through a patchbay.
///
/// Every method fetches and builds a new snapshot; nothing is cached between
/// calls.
pub struct GraphQuery<'a, P: Patchbay + ?Sized> {
    patchbay: &'a P,
}

impl<'a, P: Patchbay + ?Sized> GraphQuery<'a, P> {
    /// Create a query over the given patchbay.
    #[must_use]
    pub fn new(patchbay: &'a P) -> Self {
        Self { patchbay }
    }

    /// Fetch and build the current graph.
    ///
    /// # Errors
    /// Returns an error if the snapshot cannot be fetched or is malformed.
    pub fn graph(&self) -> Result<Graph> {
        let raw = self.patchbay.get_graph(FULL_SNAPSHOT)?;
        debug!(version = raw.version, clients = raw.clients.len(), "Snapshot fetched");
        Graph::build(&raw, self.patchbay)
    }

    /// Get all clients.
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn clients(&self) -> Result<Vec<Client>> {
        Ok(self.graph()?.into_clients())
    }

    /// Get clients with the given process ID.
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn clients_by_pid(&self, pid: i64) -> Result<Vec<Client>> {
        let mut clients = self.clients()?;
        clients.retain(|c| c.pid() == pid);
        Ok(clients)
    }

    /// Get clients whose name matches the pattern.
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn clients_matching(&self, pattern: &NamePattern) -> Result<Vec<Client>> {
        let mut clients = self.clients()?;
        clients.retain(|c| pattern.matches(c.name()));
        Ok(clients)
    }

    /// Get the hardware I/O clients (`system|firewire_pcm`).
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn system_clients(&self) -> Result<Vec<Client>> {
        self.clients_matching(&NamePattern::system_clients())
    }

    /// Get all ports, in client order then port order.
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn ports(&self) -> Result<Vec<Port>> {
        Ok(self.graph()?.ports().cloned().collect())
    }

    /// Get all connections.
    ///
    /// # Errors
    /// Returns an error if the graph cannot be read.
    pub fn connections(&self) -> Result<Vec<Connection>> {
        Ok(self.graph()?.into_connections())
    }
}
