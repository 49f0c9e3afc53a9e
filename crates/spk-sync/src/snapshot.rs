//! Snapshot store: the authoritative last-known parking state, its offset,
//! and the reconciliation decision for reconnecting clients.

use spk_schemas::{ParkingSlot, StateOffset};

use crate::merge::merge_slot_states;
use crate::offset::OffsetSource;

// ---------------------------------------------------------------------------
// SyncDecision
// ---------------------------------------------------------------------------

/// Answer to a client `reconnect:sync` request.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncDecision {
    /// The client's offset matches ours, or nothing has ever been published.
    /// Nothing to send.
    Current,
    /// Offsets differ: resend the full last-known snapshot, tagged with the
    /// current authoritative offset, to the requesting connection only.
    Resend {
        parking_states: Vec<ParkingSlot>,
        offset: StateOffset,
    },
}

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Owns the only shared mutable state of the protocol: the last-known full
/// snapshot and the offset counter. Mutated solely through
/// [`record_publish`][SnapshotStore::record_publish].
///
/// A server restart resets this store; the resulting offset mismatch costs
/// reconnecting clients exactly one resync, which is why no replay log is
/// kept.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    slots: Option<Vec<ParkingSlot>>,
    source: OffsetSource,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a publish of `slots` at wall-clock `now_ms` and return the
    /// offset to stamp on the outgoing broadcast.
    ///
    /// `slots` must be `slotId`-ascending (boundary-validated upstream). A
    /// sequence covering at least as many slots as the held snapshot replaces
    /// it; a partial sequence is folded into the held full snapshot so a
    /// later resync always carries the complete slot table.
    pub fn record_publish(&mut self, slots: &[ParkingSlot], now_ms: i64) -> StateOffset {
        let offset = self.source.next(now_ms);
        self.slots = Some(match self.slots.take() {
            None => slots.to_vec(),
            Some(held) if slots.len() >= held.len() => slots.to_vec(),
            Some(held) => merge_slot_states(&held, slots).slots,
        });
        offset
    }

    /// Compare a reconnecting client's `last_seen` offset with ours.
    ///
    /// Inequality is the only check: client clocks are not assumed monotonic,
    /// so "older" and "newer" are treated alike. Never fails; with no
    /// snapshot held there is simply nothing to send.
    pub fn sync_request(&self, last_seen: StateOffset) -> SyncDecision {
        match &self.slots {
            Some(slots) if last_seen != self.source.current() => SyncDecision::Resend {
                parking_states: slots.clone(),
                offset: self.source.current(),
            },
            _ => SyncDecision::Current,
        }
    }

    /// The current authoritative offset ([`StateOffset::ZERO`] before the
    /// first publish).
    pub fn offset(&self) -> StateOffset {
        self.source.current()
    }

    /// The held full snapshot, if anything has been published yet.
    pub fn snapshot(&self) -> Option<&[ParkingSlot]> {
        self.slots.as_deref()
    }
}
