//! Raw patchbay snapshot rows.
//!
//! These records mirror one `GetGraph` reply field for field. They carry no
//! behaviour beyond shape validation; [`crate::Graph::build`] turns them into
//! the domain model.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One `GetGraph` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGraph {
    /// Graph version reported by the server
    pub version: u64,
    /// Clients in server order
    pub clients: Vec<ClientRow>,
    /// Connections in server order
    pub connections: Vec<ConnectionRow>,
}

/// A client and its ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRow {
    pub id: u64,
    pub name: String,
    pub ports: Vec<PortRow>,
}

/// A single port of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRow {
    pub id: u64,
    pub name: String,
    /// `JackPortFlags` bits
    pub flags: u32,
    /// `JackPortType` code
    pub type_code: u32,
}

/// A connection between two ports, identified by both IDs and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRow {
    pub source_client_id: u64,
    pub source_client: String,
    pub source_port_id: u64,
    pub source_port: String,
    pub dest_client_id: u64,
    pub dest_client: String,
    pub dest_port_id: u64,
    pub dest_port: String,
    pub id: u64,
}

impl RawGraph {
    /// Check the identifier invariants of the snapshot.
    ///
    /// # Errors
    /// Returns [`Error::MalformedSnapshot`] if a client ID repeats, or a port
    /// ID repeats within one client.
    pub fn validate(&self) -> Result<()> {
        let mut client_ids = HashSet::new();
        for client in &self.clients {
            if !client_ids.insert(client.id) {
                return Err(Error::malformed(format!(
                    "duplicate client id {} ({})",
                    client.id, client.name
                )));
            }

            let mut port_ids = HashSet::new();
            for port in &client.ports {
                if !port_ids.insert(port.id) {
                    return Err(Error::malformed(format!(
                        "duplicate port id {} on client {}",
                        port.id, client.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of ports across all clients.
    #[must_use]
    pub fn port_count(&self) -> usize {
        self.clients.iter().map(|c| c.ports.len()).sum()
    }
}
