//! Candidate port selection.

use crate::error::Result;
use crate::pattern::{MatchMode, NamePattern};
use crate::port::Port;

/// Patterns selecting source (output) and destination (input) ports.
#[derive(Debug, Clone)]
pub struct Selector {
    pub source_client: NamePattern,
    pub source_port: NamePattern,
    pub dest_client: NamePattern,
    pub dest_port: NamePattern,
}

/// Ports eligible for pairing, in snapshot order.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    /// Output ports matching the source patterns
    pub sources: Vec<Port>,
    /// Input ports matching the destination patterns
    pub dests: Vec<Port>,
}

impl Selector {
    /// Compile a selector from four pattern strings.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidPattern`] for the first pattern that
    /// does not compile.
    pub fn compile(
        source_client: &str,
        source_port: &str,
        dest_client: &str,
        dest_port: &str,
        mode: MatchMode,
    ) -> Result<Self> {
        Ok(Self {
            source_client: NamePattern::with_mode(source_client, mode)?,
            source_port: NamePattern::with_mode(source_port, mode)?,
            dest_client: NamePattern::with_mode(dest_client, mode)?,
            dest_port: NamePattern::with_mode(dest_port, mode)?,
        })
    }

    #[must_use]
    pub fn is_source(&self, port: &Port) -> bool {
        port.is_output()
            && self.source_client.matches(port.client())
            && self.source_port.matches(port.name())
    }

    #[must_use]
    pub fn is_dest(&self, port: &Port) -> bool {
        port.is_input()
            && self.dest_client.matches(port.client())
            && self.dest_port.matches(port.name())
    }

    /// Split a flattened port list into candidate sources and destinations.
    ///
    /// A port with both direction bits set may appear in both lists.
    #[must_use]
    pub fn select<'p, I>(&self, ports: I) -> Candidates
    where
        I: IntoIterator<Item = &'p Port>,
    {
        let mut candidates = Candidates::default();
        for port in ports {
            if self.is_source(port) {
                candidates.sources.push(port.clone());
            }
            if self.is_dest(port) {
                candidates.dests.push(port.clone());
            }
        }
        candidates
    }
}

impl Default for Selector {
    /// Hardware outputs to hardware inputs, every port.
    fn default() -> Self {
        Self {
            source_client: NamePattern::system_clients(),
            source_port: NamePattern::any(),
            dest_client: NamePattern::system_clients(),
            dest_port: NamePattern::any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{MediaType, PortFlags};

    fn port(client_id: u64, client: &str, id: u64, name: &str, flags: PortFlags) -> Port {
        Port::new(client_id, client, id, name, MediaType::Audio, flags)
    }

    fn ports() -> Vec<Port> {
        vec![
            port(1, "system", 1, "capture_1", PortFlags::OUTPUT | PortFlags::PHYSICAL),
            port(1, "system", 2, "capture_2", PortFlags::OUTPUT | PortFlags::PHYSICAL),
            port(1, "system", 3, "playback_1", PortFlags::INPUT | PortFlags::PHYSICAL),
            port(2, "ardour", 1, "in_1", PortFlags::INPUT),
            port(2, "ardour", 2, "in_2", PortFlags::INPUT),
            port(2, "ardour", 3, "out_1", PortFlags::OUTPUT),
            port(3, "my_system", 1, "capture_1", PortFlags::OUTPUT),
        ]
    }

    fn names(ports: &[Port]) -> Vec<String> {
        ports.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_sources_are_outputs_and_dests_are_inputs() {
        let selector = Selector::compile("system", ".*", "ardour", "in_", MatchMode::Start).unwrap();
        let candidates = selector.select(&ports());

        assert_eq!(names(&candidates.sources), ["system:capture_1", "system:capture_2"]);
        assert_eq!(names(&candidates.dests), ["ardour:in_1", "ardour:in_2"]);
    }

    #[test]
    fn test_default_selects_hardware_loopback() {
        let candidates = Selector::default().select(&ports());

        assert_eq!(names(&candidates.sources), ["system:capture_1", "system:capture_2"]);
        assert_eq!(names(&candidates.dests), ["system:playback_1"]);
    }

    #[test]
    fn test_no_match_yields_empty_candidates() {
        let selector = Selector::compile("nobody", ".*", "ardour", ".*", MatchMode::Start).unwrap();
        let candidates = selector.select(&ports());

        assert!(candidates.sources.is_empty());
        assert_eq!(candidates.dests.len(), 2);
    }

    #[test]
    fn test_full_mode_rejects_prefix_matches() {
        let selector =
            Selector::compile("system", "capture", "ardour", "in_1", MatchMode::Full).unwrap();
        let candidates = selector.select(&ports());

        assert!(candidates.sources.is_empty());
        assert_eq!(names(&candidates.dests), ["ardour:in_1"]);
    }

    #[test]
    fn test_compile_rejects_bad_pattern() {
        assert!(Selector::compile(".*", "[", ".*", ".*", MatchMode::Start).is_err());
    }
}
