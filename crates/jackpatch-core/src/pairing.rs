//! Positional pairing of candidate ports.
//!
//! The i-th selected source is paired with the i-th selected destination,
//! after skipping `source_start` sources and `dest_start` destinations. The
//! number of pairs is bounded by the shorter candidate list and the optional
//! limit. Pairing never looks at port names or channel numbers.

use std::fmt;

use serde::Serialize;

use crate::port::Port;

/// Offsets and limit applied when pairing candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairWindow {
    /// Maximum number of pairs; `None` is unbounded
    pub limit: Option<usize>,
    /// Index of the first source candidate to use
    pub source_start: usize,
    /// Index of the first destination candidate to use
    pub dest_start: usize,
}

impl PairWindow {
    /// Build a window from a signed limit where any negative value means unbounded.
    #[must_use]
    pub fn from_signed_limit(limit: i64, source_start: usize, dest_start: usize) -> Self {
        Self { limit: usize::try_from(limit).ok(), source_start, dest_start }
    }
}

/// A source output port and the destination input port it pairs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortPair {
    pub source: Port,
    pub dest: Port,
}

impl fmt::Display for PortPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// Pair sources with destinations by position.
#[must_use]
pub fn pair_ports(sources: &[Port], dests: &[Port], window: PairWindow) -> Vec<PortPair> {
    let mut n = sources.len().min(dests.len());
    if let Some(limit) = window.limit {
        n = n.min(limit);
    }

    let source_end = sources.len().min(window.source_start.saturating_add(n));
    let dest_end = dests.len().min(window.dest_start.saturating_add(n));

    let sources = sources.get(window.source_start..source_end).unwrap_or_default();
    let dests = dests.get(window.dest_start..dest_end).unwrap_or_default();

    sources
        .iter()
        .zip(dests)
        .map(|(source, dest)| PortPair { source: source.clone(), dest: dest.clone() })
        .collect()
}
