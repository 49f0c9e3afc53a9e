//! Scenario: wire-format compatibility with the original socket contract.
//!
//! Existing viewers speak camelCase payloads and `namespace:verb` event tags.
//! These tests pin the JSON shapes so a schema refactor cannot silently break
//! deployed clients.

use chrono::{TimeZone, Utc};
use spk_schemas::{
    CardScanType, ClientEvent, ParkingSlot, ScannedLog, ServerEvent, SlotState, StateOffset,
};

// ---------------------------------------------------------------------------
// ParkingSlot
// ---------------------------------------------------------------------------

#[test]
fn parking_slot_uses_camel_case_and_screaming_state() {
    let slot = ParkingSlot::new(3, SlotState::Unavailable);
    let json = serde_json::to_value(&slot).unwrap();
    assert_eq!(json, serde_json::json!({"slotId": 3, "state": "UNAVAILABLE"}));
}

#[test]
fn parking_slot_round_trips() {
    let json = r#"{"slotId":1,"state":"AVAILABLE"}"#;
    let slot: ParkingSlot = serde_json::from_str(json).unwrap();
    assert_eq!(slot, ParkingSlot::new(1, SlotState::Available));
}

// ---------------------------------------------------------------------------
// Client events
// ---------------------------------------------------------------------------

#[test]
fn user_join_is_a_bare_event_tag() {
    let ev: ClientEvent = serde_json::from_str(r#"{"event":"user:join"}"#).unwrap();
    assert_eq!(ev, ClientEvent::UserJoin);
}

#[test]
fn reconnect_sync_carries_an_integer_offset() {
    let ev: ClientEvent =
        serde_json::from_str(r#"{"event":"reconnect:sync","data":{"offset":1000}}"#).unwrap();
    assert_eq!(
        ev,
        ClientEvent::ReconnectSync {
            offset: StateOffset(1000)
        }
    );
}

#[test]
fn cardlist_join_carries_the_user_id() {
    let ev: ClientEvent =
        serde_json::from_str(r#"{"event":"cardlist-page:join","data":{"userId":"u1"}}"#).unwrap();
    assert_eq!(
        ev,
        ClientEvent::CardListJoin {
            user_id: "u1".to_string()
        }
    );
}

#[test]
fn unknown_event_tag_fails_to_parse() {
    let err = serde_json::from_str::<ClientEvent>(r#"{"event":"admin:reboot"}"#);
    assert!(err.is_err(), "unknown events must be rejected at the boundary");
}

// ---------------------------------------------------------------------------
// Server events
// ---------------------------------------------------------------------------

#[test]
fn parking_slot_update_carries_states_and_offset() {
    let ev = ServerEvent::ParkingSlotUpdate {
        parking_states: vec![ParkingSlot::new(2, SlotState::Unavailable)],
        offset: StateOffset(1700000000000),
    };
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "event": "parking-slot:update",
            "data": {
                "parkingStates": [{"slotId": 2, "state": "UNAVAILABLE"}],
                "offset": 1700000000000i64
            }
        })
    );
}

#[test]
fn card_update_carries_the_log_and_no_offset() {
    let log = ScannedLog {
        card_id: "c-9".to_string(),
        license_plate: "51A-123.45".to_string(),
        scan_type: CardScanType::Checkin,
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap(),
        user_id: "u1".to_string(),
    };
    let json = serde_json::to_value(ServerEvent::CardUpdate { log }).unwrap();

    assert_eq!(json["event"], "card:update");
    assert_eq!(json["data"]["log"]["cardId"], "c-9");
    assert_eq!(json["data"]["log"]["type"], "CHECKIN");
    assert!(
        json["data"].get("offset").is_none(),
        "card events are not part of the reconciliation protocol"
    );
}
