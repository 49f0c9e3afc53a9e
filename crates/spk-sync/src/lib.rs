//! spk-sync
//!
//! Real-time parking-state synchronization core.
//!
//! Architectural decisions:
//! - Room membership is ephemeral; nothing is persisted
//! - Offsets are strictly increasing even within one millisecond
//! - Reconciliation checks equality only; any mismatch resends the snapshot
//! - One latest snapshot, no replay log (slot table is a total function of
//!   slotId, not an event log)
//! - Merge never drops updates silently; unmatched ids are reported
//!
//! Deterministic, pure logic. No IO, no wall-clock. The runtime provides
//! `now_ms` and owns the transport.

mod merge;
mod offset;
mod rooms;
mod snapshot;

pub use merge::{merge_slot_states, sort_slot_states, MergedStates};
pub use offset::OffsetSource;
pub use rooms::{ConnId, Room, RoomRouter};
pub use snapshot::{SnapshotStore, SyncDecision};
