//! jackpatch Core - JACK graph model, port selection and pairing.
//!
//! This crate turns a raw patchbay snapshot into typed clients, ports and
//! connections, selects candidate ports by pattern, pairs them positionally
//! and dispatches connect/disconnect requests through a [`Patchbay`].
//!
//! The transport itself lives behind the [`Patchbay`] trait so the model can
//! be driven by D-Bus, a snapshot file or a test double.

pub mod client;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod graph;
pub mod pairing;
pub mod patchbay;
pub mod pattern;
pub mod port;
pub mod query;
pub mod selector;
pub mod snapshot;

pub use client::{Client, PortRequirement};
pub use connection::Connection;
pub use dispatch::{
    Action, ActionError, ActionOutcome, ActionStatus, BatchReport, Dispatcher, FailurePolicy,
};
pub use error::{Error, Result};
pub use graph::Graph;
pub use pairing::{PairWindow, PortPair, pair_ports};
pub use patchbay::{Patchbay, TransportError, TransportResult};
pub use pattern::{MATCH_ALL, MatchMode, NamePattern, SYSTEM_CLIENT_PATTERN};
pub use port::{MediaType, Port, PortFlags, PortId};
pub use query::GraphQuery;
pub use selector::{Candidates, Selector};
pub use snapshot::{ClientRow, ConnectionRow, PortRow, RawGraph};
