//! Socket hub: the one service object owning room membership, the snapshot
//! store and the live connection registry.
//!
//! Replaces the usual pile of process-wide globals (transport handle, last
//! snapshot, offset counter) with an explicitly constructed value handed to
//! whoever needs to publish. The hub performs no IO itself: delivery is a
//! `send` on a per-connection unbounded channel, and the websocket writer
//! task drains it.
//!
//! Failure semantics: publishing never raises. A closed channel, an absent
//! member or a shut-down hub all degrade to a no-op, so gate-validation
//! processing is never blocked by broadcast problems.

use std::collections::HashMap;

use spk_schemas::{ClientEvent, ParkingSlot, ScannedLog, ServerEvent, StateOffset};
use spk_sync::{ConnId, Room, RoomRouter, SnapshotStore, SyncDecision};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Connection registry + room router + snapshot store behind one lock.
///
/// Every method is synchronous; callers hold the `RwLock` in `AppState` for
/// the duration of one short critical section, which gives publishes and
/// membership changes a total order equivalent to a single event loop.
#[derive(Debug, Default)]
pub struct SocketHub {
    router: RoomRouter,
    store: SnapshotStore,
    conns: HashMap<ConnId, UnboundedSender<ServerEvent>>,
    shutting_down: bool,
}

impl SocketHub {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    /// Register a live connection and its outbound channel.
    pub fn register(&mut self, conn: ConnId, tx: UnboundedSender<ServerEvent>) {
        if self.shutting_down {
            return;
        }
        self.conns.insert(conn, tx);
        debug!(%conn, "socket connected");
    }

    /// Disconnect semantics: drop the channel and every room membership.
    /// The client must re-join its rooms on reconnect.
    pub fn unregister(&mut self, conn: ConnId) {
        self.conns.remove(&conn);
        self.router.drop_connection(conn);
        debug!(%conn, "socket disconnected");
    }

    /// Stop accepting registrations and drop all live connections.
    /// Subsequent publishes are documented no-ops.
    pub fn shutdown(&mut self) {
        self.shutting_down = true;
        self.conns.clear();
        info!("socket hub shut down");
    }

    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }

    // -----------------------------------------------------------------------
    // Inbound client events
    // -----------------------------------------------------------------------

    /// Apply one boundary-validated client event.
    pub fn handle_client_event(&mut self, conn: ConnId, event: ClientEvent) {
        match event {
            ClientEvent::UserJoin => {
                self.router.join(conn, Room::ParkingArea);
                debug!(%conn, "joined parking-area");
            }
            ClientEvent::UserLeave => {
                self.router.leave(conn, &Room::ParkingArea);
                debug!(%conn, "left parking-area");
            }
            ClientEvent::ReconnectSync { offset } => self.answer_sync(conn, offset),
            ClientEvent::CardListJoin { user_id } => {
                self.router.join(conn, Room::card_list(user_id));
            }
            ClientEvent::CardListLeave { user_id } => {
                self.router.leave(conn, &Room::card_list(user_id));
            }
            ClientEvent::CardListAuthorizedJoin => {
                self.router.join(conn, Room::CardListAuthorized);
            }
            ClientEvent::CardListAuthorizedLeave => {
                self.router.leave(conn, &Room::CardListAuthorized);
            }
        }
    }

    /// Offset comparison for a reconnecting viewer. A mismatch resends the
    /// full last-known snapshot to the requesting connection only; the rest
    /// of the room is already current.
    fn answer_sync(&self, conn: ConnId, last_seen: StateOffset) {
        match self.store.sync_request(last_seen) {
            SyncDecision::Current => {
                debug!(%conn, offset = last_seen.millis(), "client already current");
            }
            SyncDecision::Resend {
                parking_states,
                offset,
            } => {
                info!(
                    %conn,
                    client_offset = last_seen.millis(),
                    server_offset = offset.millis(),
                    "offset mismatch, resending snapshot"
                );
                self.unicast(
                    conn,
                    ServerEvent::ParkingSlotUpdate {
                        parking_states,
                        offset,
                    },
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Outbound publishes
    // -----------------------------------------------------------------------

    /// Publish a partial-or-full, `slotId`-ascending slot update to the
    /// parking-area room and return the offset it was stamped with.
    pub fn publish_parking_update(&mut self, slots: Vec<ParkingSlot>) -> StateOffset {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let offset = self.store.record_publish(&slots, now_ms);

        self.broadcast(
            &Room::ParkingArea,
            ServerEvent::ParkingSlotUpdate {
                parking_states: slots,
                offset,
            },
        );
        info!(offset = offset.millis(), "parking update published");
        offset
    }

    /// Push one scanned-card log to the card's owner and to the authorized
    /// room. Fire-and-forget: no offset, no reconciliation.
    pub fn publish_card_event(&self, log: ScannedLog) {
        let targets = self.router.card_event_targets(&log.user_id);
        info!(
            card_id = %log.card_id,
            user_id = %log.user_id,
            targets = targets.len(),
            "card event published"
        );
        for conn in targets {
            self.unicast(conn, ServerEvent::CardUpdate { log: log.clone() });
        }
    }

    fn broadcast(&self, room: &Room, event: ServerEvent) {
        for conn in self.router.members(room) {
            self.unicast(conn, event.clone());
        }
    }

    fn unicast(&self, conn: ConnId, event: ServerEvent) {
        if self.shutting_down {
            return;
        }
        let Some(tx) = self.conns.get(&conn) else {
            // Member without a live channel: the connection raced a disconnect.
            warn!(%conn, "dropping event for vanished connection");
            return;
        };
        // A closed channel means the writer task is gone; unregister will
        // catch up shortly.
        let _ = tx.send(event);
    }
}
