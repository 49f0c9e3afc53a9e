//! Client merge engine: fold a partial slot update into a held full snapshot.

use spk_schemas::{ParkingSlot, SlotId};

// ---------------------------------------------------------------------------
// MergedStates
// ---------------------------------------------------------------------------

/// Result of [`merge_slot_states`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedStates {
    /// The new full sequence: same length and `slotId` set as the held input.
    pub slots: Vec<ParkingSlot>,
    /// Update entries the cursor never matched: ids absent from the held
    /// sequence or delivered out of order. The merge result is unaffected;
    /// callers decide whether to log or reject.
    pub dropped: Vec<SlotId>,
}

impl MergedStates {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Fold `update` into `held`, producing a new full sequence in which every
/// slot keeps its previous state unless explicitly present in the update.
///
/// Single-pass linear merge of two `slotId`-ascending sequences: a cursor
/// walks `update` in lock-step with matching ids in `held`. O(n) in the held
/// length; neither input is mutated.
///
/// # Preconditions
///
/// Both sequences strictly ascending by `slotId` with no duplicates, and the
/// update's id set a subset of the held one. Violations stall the cursor and
/// the unmatched tail of the update is reported in
/// [`MergedStates::dropped`] rather than applied.
pub fn merge_slot_states(held: &[ParkingSlot], update: &[ParkingSlot]) -> MergedStates {
    let mut cursor = 0;
    let slots = held
        .iter()
        .map(|current| {
            if update
                .get(cursor)
                .is_some_and(|u| u.slot_id == current.slot_id)
            {
                let merged = update[cursor].clone();
                cursor += 1;
                merged
            } else {
                current.clone()
            }
        })
        .collect();

    MergedStates {
        slots,
        dropped: update[cursor..].iter().map(|s| s.slot_id).collect(),
    }
}

/// Sort a slot sequence ascending by `slotId`, the order both merge inputs
/// require. Boundary helper for payloads arriving in sensor order.
pub fn sort_slot_states(mut slots: Vec<ParkingSlot>) -> Vec<ParkingSlot> {
    slots.sort_by_key(|s| s.slot_id);
    slots
}
