//! `jackdbus` patchbay over the D-Bus session bus.
//!
//! Inspect the interface by hand with:
//! `dbus-send --session --print-reply --dest=org.jackaudio.service /org/jackaudio/Controller org.jackaudio.JackPatchbay.GetGraph uint64:0`

use jackpatch_core::{
    ClientRow, ConnectionRow, Patchbay, PortRow, RawGraph, TransportError, TransportResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zbus::blocking::{Connection, Proxy};

use crate::error::BusResult;

/// Default well-known name of the JACK D-Bus service.
pub const JACK_SERVICE: &str = "org.jackaudio.service";
/// Default object path of the JACK controller.
pub const JACK_CONTROLLER_PATH: &str = "/org/jackaudio/Controller";
/// Default patchbay interface.
pub const JACK_PATCHBAY_INTERFACE: &str = "org.jackaudio.JackPatchbay";

const SERVICE_UNKNOWN: &str = "org.freedesktop.DBus.Error.ServiceUnknown";

/// `(id, name, flags, type)`
type PortTuple = (u64, String, u32, u32);
/// `(id, name, ports)`
type ClientTuple = (u64, String, Vec<PortTuple>);
/// `(src client id, src client, src port id, src port, dst client id, dst client, dst port id, dst port, id)`
type ConnectionTuple = (u64, String, u64, String, u64, String, u64, String, u64);
/// `GetGraph` out arguments: `t a(tsa(tsuu)) a(tstststst)`
type GraphReply = (u64, Vec<ClientTuple>, Vec<ConnectionTuple>);

/// Where the patchbay lives on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusAddress {
    /// Well-known service name
    #[serde(default = "default_service")]
    pub service: String,
    /// Controller object path
    #[serde(default = "default_object_path")]
    pub object_path: String,
    /// Patchbay interface name
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for BusAddress {
    fn default() -> Self {
        Self {
            service: default_service(),
            object_path: default_object_path(),
            interface: default_interface(),
        }
    }
}

fn default_service() -> String {
    JACK_SERVICE.to_string()
}

fn default_object_path() -> String {
    JACK_CONTROLLER_PATH.to_string()
}

fn default_interface() -> String {
    JACK_PATCHBAY_INTERFACE.to_string()
}

/// Patchbay backed by a session bus connection to `jackdbus`.
///
/// The connection is owned by this value and closed when it is dropped.
pub struct DbusPatchbay {
    proxy: Proxy<'static>,
    // Keeps the bus connection open for the proxy.
    _connection: Connection,
}

impl DbusPatchbay {
    /// Connect to the session bus and bind the patchbay interface.
    ///
    /// Does not check that the service is running; the first call reports
    /// [`TransportError::Unavailable`] if it is not.
    ///
    /// # Errors
    /// Returns an error if the session bus cannot be reached or the address
    /// is not a valid D-Bus name/path.
    pub fn connect_session(address: &BusAddress) -> BusResult<Self> {
        let connection = Connection::session()?;
        let proxy = Proxy::new(
            &connection,
            address.service.clone(),
            address.object_path.clone(),
            address.interface.clone(),
        )?;
        info!(service = %address.service, path = %address.object_path, "Connected to session bus");
        Ok(Self { proxy, _connection: connection })
    }
}

impl Patchbay for DbusPatchbay {
    fn get_graph(&self, known_version: u64) -> TransportResult<RawGraph> {
        let reply: GraphReply = self
            .proxy
            .call("GetGraph", &(known_version,))
            .map_err(|e| transport_error("GetGraph", e))?;
        let graph = raw_graph(reply);
        debug!(version = graph.version, clients = graph.clients.len(), "GetGraph");
        Ok(graph)
    }

    fn client_pid(&self, client_id: u64) -> TransportResult<i64> {
        let pid: i64 = self
            .proxy
            .call("GetClientPID", &(client_id,))
            .map_err(|e| transport_error("GetClientPID", e))?;
        debug!(client_id, pid, "GetClientPID");
        Ok(pid)
    }

    fn connect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()> {
        self.proxy
            .call::<_, _, ()>(
                "ConnectPortsByName",
                &(source_client, source_port, dest_client, dest_port),
            )
            .map_err(|e| transport_error("ConnectPortsByName", e))
    }

    fn disconnect_ports(
        &self,
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
    ) -> TransportResult<()> {
        self.proxy
            .call::<_, _, ()>(
                "DisconnectPortsByName",
                &(source_client, source_port, dest_client, dest_port),
            )
            .map_err(|e| transport_error("DisconnectPortsByName", e))
    }
}

/// Convert a decoded `GetGraph` reply into snapshot rows.
fn raw_graph((version, clients, connections): GraphReply) -> RawGraph {
    let clients = clients
        .into_iter()
        .map(|(id, name, ports)| ClientRow {
            id,
            name,
            ports: ports
                .into_iter()
                .map(|(id, name, flags, type_code)| PortRow { id, name, flags, type_code })
                .collect(),
        })
        .collect();

    let connections = connections
        .into_iter()
        .map(
            |(
                source_client_id,
                source_client,
                source_port_id,
                source_port,
                dest_client_id,
                dest_client,
                dest_port_id,
                dest_port,
                id,
            )| ConnectionRow {
                source_client_id,
                source_client,
                source_port_id,
                source_port,
                dest_client_id,
                dest_client,
                dest_port_id,
                dest_port,
                id,
            },
        )
        .collect();

    RawGraph { version, clients, connections }
}

/// Classify a failed call.
fn transport_error(method: &str, err: zbus::Error) -> TransportError {
    match err {
        zbus::Error::Variant(e) => TransportError::Decode(format!("{method}: {e}")),
        zbus::Error::InputOutput(e) => TransportError::Unavailable(e.to_string()),
        zbus::Error::Address(e) => TransportError::Unavailable(e),
        zbus::Error::MethodError(name, detail, _) => {
            let message = detail.unwrap_or_else(|| name.to_string());
            if name.as_str() == SERVICE_UNKNOWN {
                TransportError::Unavailable(message)
            } else {
                TransportError::method_failed(method, message)
            }
        }
        other => TransportError::method_failed(method, other.to_string()),
    }
}
