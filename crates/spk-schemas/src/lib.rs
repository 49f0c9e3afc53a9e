//! spk-schemas
//!
//! Wire-level data model shared by the sync core, the gate client and the
//! daemon. Field and event names follow the original socket contract
//! (camelCase fields, `namespace:verb` event tags) so existing viewers keep
//! working against this server.
//!
//! No business logic lives here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parking slots
// ---------------------------------------------------------------------------

/// Identifier of one physical parking space. Fixed at deployment; ≥ 1.
pub type SlotId = u32;

/// Occupancy state of a slot. Only this field ever changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotState {
    Available,
    Unavailable,
}

/// One physical parking space and its current occupancy.
///
/// The full parking state is a `slotId`-ascending sequence of these, one per
/// physical slot, with no duplicate ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSlot {
    pub slot_id: SlotId,
    pub state: SlotState,
}

impl ParkingSlot {
    pub fn new(slot_id: SlotId, state: SlotState) -> Self {
        Self { slot_id, state }
    }
}

// ---------------------------------------------------------------------------
// StateOffset
// ---------------------------------------------------------------------------

/// Version marker attached to full-snapshot broadcasts.
///
/// Monotonically non-decreasing per emitted broadcast. Clients compare it for
/// equality only; it detects staleness, it does not order causal history.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateOffset(pub i64);

impl StateOffset {
    /// Offset reported by a client that has never seen a broadcast.
    pub const ZERO: StateOffset = StateOffset(0);

    pub fn millis(self) -> i64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Scanned card logs
// ---------------------------------------------------------------------------

/// Direction of a gate scan: `"R"` lane is checkin, every other lane checkout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardScanType {
    Checkin,
    Checkout,
}

/// One successful gate validation. Immutable after creation; appended to a
/// history ordered by `created_at` descending (persistence is the CRUD
/// layer's job, not ours).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedLog {
    pub card_id: String,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub scan_type: CardScanType,
    pub created_at: DateTime<Utc>,
    /// Owner of the scanned card; drives card-event room targeting.
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Socket protocol: client to server
// ---------------------------------------------------------------------------

/// Events a viewer may send over the socket.
///
/// Tagged-enum schema validated at the boundary: a frame that does not parse
/// into one of these variants never reaches the room router or the sync core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join the parking-area broadcast group.
    #[serde(rename = "user:join")]
    UserJoin,
    /// Leave the parking-area broadcast group.
    #[serde(rename = "user:leave")]
    UserLeave,
    /// Offset comparison on (re)connect; a mismatch triggers a unicast resend
    /// of the last-known snapshot.
    #[serde(rename = "reconnect:sync")]
    ReconnectSync { offset: StateOffset },
    /// Subscribe to card events for one user's cards.
    #[serde(rename = "cardlist-page:join")]
    CardListJoin {
        #[serde(rename = "userId")]
        user_id: String,
    },
    #[serde(rename = "cardlist-page:leave")]
    CardListLeave {
        #[serde(rename = "userId")]
        user_id: String,
    },
    /// Staff/admin subscription: receives every card event regardless of owner.
    #[serde(rename = "cardlist-page-authorized:join")]
    CardListAuthorizedJoin,
    #[serde(rename = "cardlist-page-authorized:leave")]
    CardListAuthorizedLeave,
}

// ---------------------------------------------------------------------------
// Socket protocol: server to client
// ---------------------------------------------------------------------------

/// Events the server pushes to room members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Partial-or-full slot update, stamped with the authoritative offset.
    #[serde(rename = "parking-slot:update")]
    ParkingSlotUpdate {
        #[serde(rename = "parkingStates")]
        parking_states: Vec<ParkingSlot>,
        offset: StateOffset,
    },
    /// One scanned-card log. No offset: card events are fire-and-forget and
    /// not subject to the reconciliation protocol.
    #[serde(rename = "card:update")]
    CardUpdate { log: ScannedLog },
}
