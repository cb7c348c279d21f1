//! JACK client model.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::patchbay::Patchbay;
use crate::pattern::NamePattern;
use crate::port::{MediaType, Port};
use crate::snapshot::ClientRow;

/// A port predicate paired with the minimum number of ports that must satisfy it.
pub type PortRequirement = (fn(&Port) -> bool, usize);

/// A JACK client and its ports, in snapshot order.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    id: u64,
    name: String,
    pid: i64,
    ports: Vec<Port>,
}

impl Client {
    /// Build a client from a snapshot row, resolving its process ID.
    ///
    /// Issues exactly one `GetClientPID` call.
    ///
    /// # Errors
    /// Returns [`crate::Error::Transport`] if the PID lookup fails.
    pub fn from_row<P: Patchbay + ?Sized>(row: &ClientRow, patchbay: &P) -> Result<Self> {
        let ports = row.ports.iter().map(|p| Port::from_row(row.id, &row.name, p)).collect();
        let pid = patchbay.client_pid(row.id)?;
        debug!(id = row.id, name = %row.name, pid, ports = row.ports.len(), "Client resolved");
        Self::new(row.id, &row.name, pid, ports)
    }

    /// Create a client from already built ports.
    ///
    /// # Errors
    /// Returns [`Error::MalformedSnapshot`] if a port belongs to another
    /// client, or a port ID repeats.
    pub fn new(id: u64, name: &str, pid: i64, ports: Vec<Port>) -> Result<Self> {
        if let Some(stray) = ports.iter().find(|p| p.client_id() != id || p.client() != name) {
            return Err(Error::malformed(format!(
                "port {stray} ({}/{}) does not belong to client {name} ({id})",
                stray.client_id(),
                stray.id()
            )));
        }

        let mut port_ids = HashSet::new();
        if let Some(dup) = ports.iter().find(|p| !port_ids.insert(p.id())) {
            return Err(Error::malformed(format!("duplicate port id {} on client {name}", dup.id())));
        }

        Ok(Self { id, name: name.to_string(), pid, ports })
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Process ID reported by the server.
    #[must_use]
    pub fn pid(&self) -> i64 {
        self.pid
    }

    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Find a port by ID pair.
    #[must_use]
    pub fn lookup_port(&self, client_id: u64, port_id: u64) -> Option<&Port> {
        self.ports.iter().find(|p| p.has_id(client_id, port_id))
    }

    /// Find a port by client and port name.
    #[must_use]
    pub fn lookup_port_by_name(&self, client: &str, port: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.is_named(client, port))
    }

    /// Get all ports whose name matches the pattern.
    #[must_use]
    pub fn ports_matching(&self, pattern: &NamePattern) -> Vec<&Port> {
        self.ports.iter().filter(|p| pattern.matches(p.name())).collect()
    }

    #[must_use]
    pub fn audio_inputs(&self) -> Vec<&Port> {
        self.ports_where(Port::is_audio_input)
    }

    #[must_use]
    pub fn audio_outputs(&self) -> Vec<&Port> {
        self.ports_where(Port::is_audio_output)
    }

    #[must_use]
    pub fn midi_inputs(&self) -> Vec<&Port> {
        self.ports_where(Port::is_midi_input)
    }

    #[must_use]
    pub fn midi_outputs(&self) -> Vec<&Port> {
        self.ports_where(Port::is_midi_output)
    }

    /// Get input ports of the given media type.
    #[must_use]
    pub fn inputs(&self, media_type: MediaType) -> Vec<&Port> {
        self.ports
            .iter()
            .filter(|p| p.is_input() && p.media_type() == media_type)
            .collect()
    }

    /// Get output ports of the given media type.
    #[must_use]
    pub fn outputs(&self, media_type: MediaType) -> Vec<&Port> {
        self.ports
            .iter()
            .filter(|p| p.is_output() && p.media_type() == media_type)
            .collect()
    }

    /// Check that the client exposes an expected port layout.
    ///
    /// Every predicate must be satisfied by at least its minimum number of
    /// ports, e.g. `[(Port::is_audio_input, 2), (Port::is_midi_output, 1)]`.
    #[must_use]
    pub fn has_all_ports(&self, requirements: &[PortRequirement]) -> bool {
        requirements
            .iter()
            .all(|(predicate, min)| self.ports.iter().filter(|p| predicate(p)).count() >= *min)
    }

    fn ports_where(&self, predicate: fn(&Port) -> bool) -> Vec<&Port> {
        self.ports.iter().filter(|p| predicate(p)).collect()
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.pid)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::patchbay::{MockPatchbay, TransportError};
    use crate::port::PortFlags;
    use crate::snapshot::PortRow;

    fn port_row(id: u64, name: &str, flags: u32, type_code: u32) -> PortRow {
        PortRow { id, name: name.to_string(), flags, type_code }
    }

    fn client_with(ports: &[(&str, PortFlags, MediaType)]) -> Client {
        let ports = ports
            .iter()
            .enumerate()
            .map(|(i, (name, flags, media))| {
                Port::new(7, "synth", i as u64, name, *media, *flags)
            })
            .collect();
        Client::new(7, "synth", 1234, ports).unwrap()
    }

    #[test]
    fn test_from_row_resolves_pid_once() {
        let row = ClientRow {
            id: 3,
            name: "ardour".to_string(),
            ports: vec![port_row(1, "in_1", 1, 0), port_row(2, "out_1", 2, 0)],
        };
        let mut patchbay = MockPatchbay::new();
        patchbay.expect_client_pid().withf(|id| *id == 3).times(1).returning(|_| Ok(4242));

        let client = Client::from_row(&row, &patchbay).unwrap();

        assert_eq!(client.pid(), 4242);
        assert_eq!(client.ports().len(), 2);
        assert!(client.ports().iter().all(|p| p.client_id() == 3 && p.client() == "ardour"));
        assert_eq!(client.to_string(), "ardour [4242]");
    }

    #[test]
    fn test_from_row_propagates_pid_failure() {
        let row = ClientRow { id: 3, name: "ardour".to_string(), ports: vec![] };
        let mut patchbay = MockPatchbay::new();
        patchbay
            .expect_client_pid()
            .returning(|_| Err(TransportError::method_failed("GetClientPID", "no such client")));

        assert_matches!(Client::from_row(&row, &patchbay), Err(Error::Transport(_)));
    }

    #[test]
    fn test_new_rejects_foreign_ports() {
        let foreign = Port::new(8, "synth", 0, "out_1", MediaType::Audio, PortFlags::OUTPUT);
        assert_matches!(Client::new(7, "synth", 1, vec![foreign]), Err(Error::MalformedSnapshot(_)));

        let renamed = Port::new(7, "other", 0, "out_1", MediaType::Audio, PortFlags::OUTPUT);
        assert_matches!(Client::new(7, "synth", 1, vec![renamed]), Err(Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_port_ids() {
        let ports = vec![
            Port::new(7, "synth", 0, "out_1", MediaType::Audio, PortFlags::OUTPUT),
            Port::new(7, "synth", 0, "out_2", MediaType::Audio, PortFlags::OUTPUT),
        ];
        assert_matches!(
            Client::new(7, "synth", 1, ports),
            Err(Error::MalformedSnapshot(msg)) if msg.contains("port id 0")
        );
    }

    #[test]
    fn test_ports_matching_preserves_order() {
        let client = client_with(&[
            ("in_1", PortFlags::INPUT, MediaType::Audio),
            ("in_2", PortFlags::INPUT, MediaType::Audio),
            ("out_1", PortFlags::OUTPUT, MediaType::Audio),
        ]);

        let pattern = NamePattern::new("in_.*").unwrap();
        let names: Vec<_> = client.ports_matching(&pattern).iter().map(|p| p.name()).collect();

        assert_eq!(names, ["in_1", "in_2"]);
    }

    #[test]
    fn test_lookup_port() {
        let client = client_with(&[
            ("in_1", PortFlags::INPUT, MediaType::Audio),
            ("out_1", PortFlags::OUTPUT, MediaType::Audio),
        ]);

        assert_eq!(client.lookup_port(7, 1).map(Port::name), Some("out_1"));
        assert!(client.lookup_port(8, 1).is_none());
        assert_eq!(client.lookup_port_by_name("synth", "in_1").map(Port::id), Some(0));
        assert!(client.lookup_port_by_name("other", "in_1").is_none());
    }

    #[test]
    fn test_filtered_views() {
        let client = client_with(&[
            ("audio_in", PortFlags::INPUT, MediaType::Audio),
            ("audio_out", PortFlags::OUTPUT, MediaType::Audio),
            ("midi_in", PortFlags::INPUT, MediaType::Midi),
            ("midi_out", PortFlags::OUTPUT, MediaType::Midi),
            ("cv_out", PortFlags::OUTPUT, MediaType::Unknown),
        ]);

        let names = |ports: Vec<&Port>| ports.iter().map(|p| p.name().to_string()).collect::<Vec<_>>();

        assert_eq!(names(client.audio_inputs()), ["audio_in"]);
        assert_eq!(names(client.audio_outputs()), ["audio_out"]);
        assert_eq!(names(client.midi_inputs()), ["midi_in"]);
        assert_eq!(names(client.midi_outputs()), ["midi_out"]);
        assert_eq!(names(client.outputs(MediaType::Unknown)), ["cv_out"]);
        assert_eq!(names(client.inputs(MediaType::Midi)), ["midi_in"]);
    }

    #[test]
    fn test_has_all_ports() {
        let requirements: [PortRequirement; 2] =
            [(Port::is_audio_input, 2), (Port::is_midi_output, 1)];

        let both = client_with(&[
            ("in_1", PortFlags::INPUT, MediaType::Audio),
            ("in_2", PortFlags::INPUT, MediaType::Audio),
            ("midi_out", PortFlags::OUTPUT, MediaType::Midi),
        ]);
        assert!(both.has_all_ports(&requirements));

        let one_audio = client_with(&[
            ("in_1", PortFlags::INPUT, MediaType::Audio),
            ("midi_out", PortFlags::OUTPUT, MediaType::Midi),
        ]);
        assert!(!one_audio.has_all_ports(&requirements));

        let no_midi = client_with(&[
            ("in_1", PortFlags::INPUT, MediaType::Audio),
            ("in_2", PortFlags::INPUT, MediaType::Audio),
        ]);
        assert!(!no_midi.has_all_ports(&requirements));

        assert!(no_midi.has_all_ports(&[]));
    }
}
