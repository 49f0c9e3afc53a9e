//! Scenario: gate validation end to end, camera service mocked.
//!
//! # Invariants under test
//!
//! 1. A "valid" camera answer returns 200 with the ScannedLog and pushes
//!    exactly one card event to subscribed connections, with the scan type
//!    derived from the gate position ("R" = CHECKIN, otherwise CHECKOUT).
//! 2. An "invalid" answer returns 422 and publishes nothing (no log, no
//!    broadcast).
//! 3. A camera-service outage returns 422 and publishes nothing; gate
//!    processing itself never crashes.

use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use spk_daemon::{config::DaemonConfig, routes, state::AppState};
use spk_schemas::{ClientEvent, ServerEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tower::ServiceExt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn state_with_camera(camera_url: String) -> Arc<AppState> {
    let config = DaemonConfig {
        camera_url,
        ..DaemonConfig::default()
    };
    Arc::new(AppState::new(&config).expect("app state"))
}

/// Attach a fake authorized-room subscriber directly to the hub.
async fn subscribe_authorized(st: &Arc<AppState>) -> UnboundedReceiver<ServerEvent> {
    let conn = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut hub = st.hub.write().await;
    hub.register(conn, tx);
    hub.handle_client_event(conn, ClientEvent::CardListAuthorizedJoin);
    rx
}

fn validate_request(gate_pos: &str) -> Request<axum::body::Body> {
    let body = serde_json::json!({
        "cardId": "c-1",
        "userId": "u1",
        "licensePlate": "51A-123.45",
        "gatePos": gate_pos
    });
    Request::builder()
        .method("POST")
        .uri("/v1/gate/validate")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

async fn call(
    router: axum::Router,
    req: Request<axum::body::Body>,
) -> (StatusCode, serde_json::Value) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// 1. Valid scan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_checkin_scan_publishes_one_card_event() {
    let camera = MockServer::start_async().await;
    let mock = camera
        .mock_async(|when, then| {
            when.method(POST)
                .path("/cards/validate")
                .json_body(serde_json::json!({
                    "plate_number": "51A-123.45",
                    "gate_pos": "R"
                }));
            then.status(200)
                .json_body(serde_json::json!({"status": "valid"}));
        })
        .await;

    let st = state_with_camera(camera.base_url());
    let mut rx = subscribe_authorized(&st).await;

    let (status, json) = call(routes::build_router(Arc::clone(&st)), validate_request("R")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "success");
    assert_eq!(json["log"]["type"], "CHECKIN");
    assert_eq!(json["log"]["cardId"], "c-1");
    mock.assert_async().await;

    match rx.try_recv() {
        Ok(ServerEvent::CardUpdate { log }) => {
            assert_eq!(log.card_id, "c-1");
            assert_eq!(log.user_id, "u1");
        }
        other => panic!("expected one card update, got {other:?}"),
    }
    assert!(rx.try_recv().is_err(), "exactly one event per scan");
}

#[tokio::test]
async fn non_r_gate_is_a_checkout() {
    let camera = MockServer::start_async().await;
    camera
        .mock_async(|when, then| {
            when.method(POST).path("/cards/validate");
            then.status(200)
                .json_body(serde_json::json!({"status": "valid"}));
        })
        .await;

    let st = state_with_camera(camera.base_url());
    let (status, json) = call(routes::build_router(st), validate_request("L")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["log"]["type"], "CHECKOUT");
}

// ---------------------------------------------------------------------------
// 2. Rejected scan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_scan_returns_422_and_publishes_nothing() {
    let camera = MockServer::start_async().await;
    camera
        .mock_async(|when, then| {
            when.method(POST).path("/cards/validate");
            then.status(200)
                .json_body(serde_json::json!({"status": "invalid"}));
        })
        .await;

    let st = state_with_camera(camera.base_url());
    let mut rx = subscribe_authorized(&st).await;

    let (status, json) = call(routes::build_router(Arc::clone(&st)), validate_request("R")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Failed to validate car license plate");

    assert!(
        rx.try_recv().is_err(),
        "an invalid scan must produce no ScannedLog and no broadcast"
    );
}

// ---------------------------------------------------------------------------
// 3. Camera outage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn camera_outage_returns_422_and_publishes_nothing() {
    let camera = MockServer::start_async().await;
    camera
        .mock_async(|when, then| {
            when.method(POST).path("/cards/validate");
            then.status(500);
        })
        .await;

    let st = state_with_camera(camera.base_url());
    let mut rx = subscribe_authorized(&st).await;

    let (status, json) = call(routes::build_router(Arc::clone(&st)), validate_request("R")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["message"], "Camera service unavailable");

    assert!(rx.try_recv().is_err());
}
