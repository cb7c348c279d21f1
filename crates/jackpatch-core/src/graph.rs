//! JACK graph snapshot model.

use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::connection::Connection;
use crate::error::Result;
use crate::patchbay::Patchbay;
use crate::port::Port;
use crate::snapshot::RawGraph;

/// An immutable view of the JACK graph at one point in time.
///
/// A graph is built in one pass from a [`RawGraph`]: clients first (each
/// resolving its PID), then connections against the complete port set.
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    version: u64,
    clients: Vec<Client>,
    connections: Vec<Connection>,
}

impl Graph {
    /// Build a graph from a raw snapshot.
    ///
    /// Issues one `GetClientPID` call per client, in snapshot order.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedSnapshot`] if the snapshot violates
    /// its invariants, or [`crate::Error::Transport`] if a PID lookup fails.
    pub fn build<P: Patchbay + ?Sized>(raw: &RawGraph, patchbay: &P) -> Result<Self> {
        raw.validate()?;

        let clients = raw
            .clients
            .iter()
            .map(|row| Client::from_row(row, patchbay))
            .collect::<Result<Vec<_>>>()?;

        let connections = raw
            .connections
            .iter()
            .map(|row| Connection::resolve(row, &clients))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            version = raw.version,
            clients = clients.len(),
            ports = raw.port_count(),
            connections = connections.len(),
            "Graph built"
        );

        Ok(Self { version: raw.version, clients, connections })
    }

    /// Graph version reported by the server.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Consume the graph, keeping only its clients.
    #[must_use]
    pub fn into_clients(self) -> Vec<Client> {
        self.clients
    }

    /// Consume the graph, keeping only its connections.
    #[must_use]
    pub fn into_connections(self) -> Vec<Connection> {
        self.connections
    }

    /// Get a client by ID.
    #[must_use]
    pub fn client(&self, id: u64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id() == id)
    }

    /// All ports, in client order then port order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.clients.iter().flat_map(Client::ports)
    }

    /// Find a port by ID pair.
    #[must_use]
    pub fn lookup_port(&self, client_id: u64, port_id: u64) -> Option<&Port> {
        self.client(client_id).and_then(|c| c.lookup_port(client_id, port_id))
    }

    /// Find a port by client and port name.
    #[must_use]
    pub fn lookup_port_by_name(&self, client: &str, port: &str) -> Option<&Port> {
        self.clients.iter().find_map(|c| c.lookup_port_by_name(client, port))
    }

    /// Connections leaving or entering the given port.
    #[must_use]
    pub fn connections_for(&self, port: &Port) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.source() == port || c.dest() == port)
            .collect()
    }

    /// Check if a connection exists from `source` to `dest`.
    #[must_use]
    pub fn is_connected(&self, source: &Port, dest: &Port) -> bool {
        self.connections.iter().any(|c| c.source() == source && c.dest() == dest)
    }
}
