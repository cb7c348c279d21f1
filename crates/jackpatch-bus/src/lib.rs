//! jackpatch Bus - patchbay access for jackpatch.
//!
//! This crate provides the [`Patchbay`](jackpatch_core::Patchbay)
//! implementations used by the CLI:
//! - [`DbusPatchbay`] talks to `jackdbus` on the session bus
//! - [`SnapshotFile`] serves a previously dumped snapshot, read-only

pub mod dbus;
pub mod error;
pub mod snapshot;

pub use dbus::{BusAddress, DbusPatchbay};
pub use error::{BusError, BusResult};
pub use snapshot::{SnapshotDocument, SnapshotFile};
