//! Connections between ports.

use std::fmt;

use serde::Serialize;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::port::Port;
use crate::snapshot::ConnectionRow;

/// An established connection from an output port to an input port.
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    id: u64,
    source: Port,
    dest: Port,
}

impl Connection {
    /// Resolve both endpoints of a snapshot row against already built clients.
    ///
    /// # Errors
    /// Returns [`Error::MalformedSnapshot`] if an endpoint does not resolve to
    /// a known port, or resolves to a port with a different name.
    pub fn resolve(row: &ConnectionRow, clients: &[Client]) -> Result<Self> {
        let source = resolve_endpoint(
            clients,
            row.source_client_id,
            &row.source_client,
            row.source_port_id,
            &row.source_port,
        )?;
        let dest = resolve_endpoint(
            clients,
            row.dest_client_id,
            &row.dest_client,
            row.dest_port_id,
            &row.dest_port,
        )?;
        Ok(Self { id: row.id, source, dest })
    }

    /// Connection ID reported by the server.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn source(&self) -> &Port {
        &self.source
    }

    #[must_use]
    pub fn dest(&self) -> &Port {
        &self.dest
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

fn resolve_endpoint(
    clients: &[Client],
    client_id: u64,
    client_name: &str,
    port_id: u64,
    port_name: &str,
) -> Result<Port> {
    let port = clients
        .iter()
        .find(|c| c.id() == client_id)
        .and_then(|c| c.lookup_port(client_id, port_id))
        .ok_or_else(|| {
            Error::malformed(format!(
                "connection endpoint {client_name}:{port_name} ({client_id}/{port_id}) does not resolve to a known port"
            ))
        })?;

    if !port.is_named(client_name, port_name) {
        return Err(Error::malformed(format!(
            "connection endpoint {client_id}/{port_id} is named {client_name}:{port_name} but the port is {port}"
        )));
    }

    Ok(port.clone())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::port::{MediaType, PortFlags};

    fn clients() -> Vec<Client> {
        vec![
            Client::new(
                1,
                "system",
                10,
                vec![
                    Port::new(1, "system", 1, "capture_1", MediaType::Audio, PortFlags::OUTPUT),
                    Port::new(1, "system", 2, "playback_1", MediaType::Audio, PortFlags::INPUT),
                ],
            )
            .unwrap(),
            Client::new(
                2,
                "ardour",
                20,
                vec![Port::new(2, "ardour", 1, "in_1", MediaType::Audio, PortFlags::INPUT)],
            )
            .unwrap(),
        ]
    }

    fn row(dest_client_id: u64, dest_client: &str, dest_port_id: u64, dest_port: &str) -> ConnectionRow {
        ConnectionRow {
            source_client_id: 1,
            source_client: "system".to_string(),
            source_port_id: 1,
            source_port: "capture_1".to_string(),
            dest_client_id,
            dest_client: dest_client.to_string(),
            dest_port_id,
            dest_port: dest_port.to_string(),
            id: 99,
        }
    }

    #[test]
    fn test_resolve_across_clients() {
        let clients = clients();
        let connection = Connection::resolve(&row(2, "ardour", 1, "in_1"), &clients).unwrap();

        assert_eq!(connection.id(), 99);
        assert_eq!(connection.source().to_string(), "system:capture_1");
        assert_eq!(connection.dest().to_string(), "ardour:in_1");
        assert_eq!(connection.to_string(), "system:capture_1 -> ardour:in_1");
    }

    #[test]
    fn test_unknown_endpoint_is_malformed() {
        let clients = clients();
        assert_matches!(
            Connection::resolve(&row(3, "ghost", 1, "in_1"), &clients),
            Err(Error::MalformedSnapshot(msg)) if msg.contains("ghost:in_1")
        );
    }

    #[test]
    fn test_name_mismatch_is_malformed() {
        let clients = clients();
        assert_matches!(
            Connection::resolve(&row(2, "ardour", 1, "in_2"), &clients),
            Err(Error::MalformedSnapshot(_))
        );
    }
}
