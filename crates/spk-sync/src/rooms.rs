//! Room router: per-connection membership in logical broadcast groups.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

/// Identifies one live socket connection. Assigned by the transport layer.
pub type ConnId = Uuid;

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// A named broadcast group. Connections opt in and out; membership dies with
/// the connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Room {
    /// Viewers of the live parking map. Receives `parking-slot:update`.
    ParkingArea,
    /// Card-event subscribers for one user's own cards.
    CardList { user_id: String },
    /// Staff/admin card-event subscribers; see every log regardless of owner.
    CardListAuthorized,
}

impl Room {
    pub fn card_list<S: Into<String>>(user_id: S) -> Self {
        Room::CardList {
            user_id: user_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomRouter
// ---------------------------------------------------------------------------

/// Tracks which connections belong to which broadcast groups.
///
/// All operations are idempotent. The router holds no senders and performs
/// no IO; the hub resolves member ids to live channels.
#[derive(Debug, Default)]
pub struct RoomRouter {
    members: HashMap<Room, HashSet<ConnId>>,
}

impl RoomRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn` to `room`. Returns `true` if the membership is new.
    pub fn join(&mut self, conn: ConnId, room: Room) -> bool {
        self.members.entry(room).or_default().insert(conn)
    }

    /// Remove `conn` from `room`. Safe on a group never joined.
    /// Returns `true` if a membership was actually removed.
    pub fn leave(&mut self, conn: ConnId, room: &Room) -> bool {
        let Some(set) = self.members.get_mut(room) else {
            return false;
        };
        let removed = set.remove(&conn);
        if set.is_empty() {
            self.members.remove(room);
        }
        removed
    }

    /// Disconnect semantics: drop every membership held by `conn`.
    pub fn drop_connection(&mut self, conn: ConnId) {
        self.members.retain(|_, set| {
            set.remove(&conn);
            !set.is_empty()
        });
    }

    pub fn is_member(&self, conn: ConnId, room: &Room) -> bool {
        self.members.get(room).is_some_and(|set| set.contains(&conn))
    }

    /// Current members of `room`.
    pub fn members(&self, room: &Room) -> Vec<ConnId> {
        self.members
            .get(room)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Targets for a card event owned by `user_id`: the owner's room plus the
    /// authorized room, deduplicated (a staff member browsing their own cards
    /// must not receive the event twice).
    pub fn card_event_targets(&self, user_id: &str) -> Vec<ConnId> {
        let mut targets: HashSet<ConnId> = HashSet::new();
        if let Some(set) = self.members.get(&Room::card_list(user_id)) {
            targets.extend(set.iter().copied());
        }
        if let Some(set) = self.members.get(&Room::CardListAuthorized) {
            targets.extend(set.iter().copied());
        }
        targets.into_iter().collect()
    }

    /// Number of groups with at least one member.
    pub fn occupied_rooms(&self) -> usize {
        self.members.len()
    }
}
