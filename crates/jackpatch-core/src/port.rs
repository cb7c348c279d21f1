//! JACK port model.

use std::fmt;
use std::hash::{Hash, Hasher};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::snapshot::PortRow;

/// Media carried by a port.
///
/// Mirrors the port type codes reported by the patchbay (`JackPortType.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Audio port (code 0)
    Audio,
    /// MIDI port (code 1)
    Midi,
    /// Any other type code
    Unknown,
}

impl MediaType {
    /// Classify a raw type code.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Audio,
            1 => Self::Midi,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Audio => "audio",
            Self::Midi => "midi",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Port flags as encoded by `JackPortFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PortFlags: u32 {
        const INPUT = 0x1;
        const OUTPUT = 0x2;
        const PHYSICAL = 0x4;
        const CAN_MONITOR = 0x8;
        const IS_TERMINAL = 0x10;
    }
}

/// Canonical identity of a port within one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId {
    /// Owning client ID
    pub client: u64,
    /// Port ID
    pub port: u64,
}

/// One port on one JACK client.
///
/// Ports are immutable values. Equality and hashing use [`PortId`]; use
/// [`Port::is_named`] to compare by client and port name.
#[derive(Debug, Clone, Serialize)]
pub struct Port {
    client: String,
    name: String,
    client_id: u64,
    id: u64,
    media_type: MediaType,
    flags: PortFlags,
}

impl Port {
    /// Create a port.
    #[must_use]
    pub fn new(
        client_id: u64,
        client: &str,
        id: u64,
        name: &str,
        media_type: MediaType,
        flags: PortFlags,
    ) -> Self {
        Self {
            client: client.to_string(),
            name: name.to_string(),
            client_id,
            id,
            media_type,
            flags,
        }
    }

    /// Build a port from a snapshot row belonging to the given client.
    pub(crate) fn from_row(client_id: u64, client: &str, row: &PortRow) -> Self {
        Self::new(
            client_id,
            client,
            row.id,
            &row.name,
            MediaType::from_code(row.type_code),
            PortFlags::from_bits_retain(row.flags),
        )
    }

    /// Name of the owning client.
    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Port name (without the client prefix).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ID of the owning client.
    #[must_use]
    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    /// Port ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Canonical identity.
    #[must_use]
    pub fn key(&self) -> PortId {
        PortId { client: self.client_id, port: self.id }
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub fn flags(&self) -> PortFlags {
        self.flags
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        self.flags.contains(PortFlags::INPUT)
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        self.flags.contains(PortFlags::OUTPUT)
    }

    /// Check if the port belongs to a hardware device.
    #[must_use]
    pub fn is_physical(&self) -> bool {
        self.flags.contains(PortFlags::PHYSICAL)
    }

    #[must_use]
    pub fn is_audio_input(&self) -> bool {
        self.is_input() && self.media_type == MediaType::Audio
    }

    #[must_use]
    pub fn is_audio_output(&self) -> bool {
        self.is_output() && self.media_type == MediaType::Audio
    }

    #[must_use]
    pub fn is_midi_input(&self) -> bool {
        self.is_input() && self.media_type == MediaType::Midi
    }

    #[must_use]
    pub fn is_midi_output(&self) -> bool {
        self.is_output() && self.media_type == MediaType::Midi
    }

    /// Check if this port has the given ID pair.
    #[must_use]
    pub fn has_id(&self, client_id: u64, port_id: u64) -> bool {
        self.client_id == client_id && self.id == port_id
    }

    /// Check if this port has the given client and port name.
    #[must_use]
    pub fn is_named(&self, client: &str, port: &str) -> bool {
        self.client == client && self.name == port
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Port {}

impl Hash for Port {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.client, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(media_type: MediaType, flags: PortFlags) -> Port {
        Port::new(1, "system", 2, "capture_1", media_type, flags)
    }

    #[test]
    fn test_media_type_from_code() {
        assert_eq!(MediaType::from_code(0), MediaType::Audio);
        assert_eq!(MediaType::from_code(1), MediaType::Midi);
        assert_eq!(MediaType::from_code(2), MediaType::Unknown);
        assert_eq!(MediaType::from_code(u32::MAX), MediaType::Unknown);
    }

    #[test]
    fn test_direction_bits() {
        let p = port(MediaType::Audio, PortFlags::from_bits_retain(0x1));
        assert!(p.is_input());
        assert!(!p.is_output());
        assert!(!p.is_physical());

        let p = port(MediaType::Audio, PortFlags::from_bits_retain(0x6));
        assert!(!p.is_input());
        assert!(p.is_output());
        assert!(p.is_physical());
    }

    #[test]
    fn test_reserved_bits_do_not_affect_direction() {
        let p = port(MediaType::Audio, PortFlags::CAN_MONITOR | PortFlags::IS_TERMINAL);
        assert!(!p.is_input());
        assert!(!p.is_output());
        assert!(!p.is_physical());
    }

    #[test]
    fn test_convenience_predicates_cross_product() {
        let media = [MediaType::Audio, MediaType::Midi, MediaType::Unknown];
        let directions = [PortFlags::INPUT, PortFlags::OUTPUT];

        for media_type in media {
            for direction in directions {
                for physical in [false, true] {
                    let mut flags = direction;
                    flags.set(PortFlags::PHYSICAL, physical);
                    let p = port(media_type, flags);

                    assert_eq!(p.is_physical(), physical);
                    assert_eq!(
                        p.is_audio_input(),
                        p.is_input() && p.media_type() == MediaType::Audio
                    );
                    assert_eq!(
                        p.is_audio_output(),
                        p.is_output() && p.media_type() == MediaType::Audio
                    );
                    assert_eq!(
                        p.is_midi_input(),
                        p.is_input() && p.media_type() == MediaType::Midi
                    );
                    assert_eq!(
                        p.is_midi_output(),
                        p.is_output() && p.media_type() == MediaType::Midi
                    );
                }
            }
        }
    }

    #[test]
    fn test_equality_uses_ids() {
        let a = Port::new(1, "system", 2, "capture_1", MediaType::Audio, PortFlags::OUTPUT);
        let renamed = Port::new(1, "system", 2, "renamed", MediaType::Audio, PortFlags::OUTPUT);
        let same_name = Port::new(1, "system", 3, "capture_1", MediaType::Audio, PortFlags::OUTPUT);

        assert_eq!(a, renamed);
        assert_ne!(a, same_name);
        assert!(same_name.is_named("system", "capture_1"));
    }

    #[test]
    fn test_display() {
        let p = port(MediaType::Audio, PortFlags::OUTPUT);
        assert_eq!(p.to_string(), "system:capture_1");
    }
}
