//! Axum router and all HTTP handlers for spk-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use spk_gate::{GateError, GatePos};
use spk_schemas::{ScannedLog, SlotId};
use spk_sync::sort_slot_states;
use tracing::{info, warn};

use crate::{
    api_types::{
        ErrorResponse, GateValidationRequest, GateValidationResponse, HealthResponse,
        ParkingUpdateRequest, ParkingUpdateResponse,
    },
    state::AppState,
    ws,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ws", get(ws::ws_handler))
        .route("/v1/parking-slots", put(update_parking_slots))
        .route("/v1/gate/validate", post(gate_validate))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// PUT /v1/parking-slots
// ---------------------------------------------------------------------------

/// Slot-state ingestion from the detection hardware.
///
/// Boundary validation: the payload is sorted by `slotId` (sensors report in
/// wiring order) and duplicate ids are rejected with 422 before anything
/// reaches the hub.
pub(crate) async fn update_parking_slots(
    State(st): State<Arc<AppState>>,
    Json(body): Json<ParkingUpdateRequest>,
) -> Response {
    if body.parking_states.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                message: "parkingStates must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    let slots = sort_slot_states(body.parking_states);
    if let Some(dup) = first_duplicate_id(&slots) {
        warn!(slot_id = dup, "rejecting update with duplicate slot id");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                message: format!("duplicate slotId {dup} in parkingStates"),
            }),
        )
            .into_response();
    }

    let accepted = slots.len();
    let offset = st.hub.write().await.publish_parking_update(slots);

    (
        StatusCode::OK,
        Json(ParkingUpdateResponse { offset, accepted }),
    )
        .into_response()
}

fn first_duplicate_id(sorted: &[spk_schemas::ParkingSlot]) -> Option<SlotId> {
    sorted
        .windows(2)
        .find(|w| w[0].slot_id == w[1].slot_id)
        .map(|w| w[0].slot_id)
}

// ---------------------------------------------------------------------------
// POST /v1/gate/validate
// ---------------------------------------------------------------------------

/// Gate-validation orchestration.
///
/// The camera service confirms the plate read at the lane matches the card's
/// vehicle. Only a `valid` answer produces a ScannedLog and a card-event
/// broadcast; a rejection or transport failure returns 422 and publishes
/// nothing.
pub(crate) async fn gate_validate(
    State(st): State<Arc<AppState>>,
    Json(body): Json<GateValidationRequest>,
) -> Response {
    let gate_pos = GatePos::from_tag(&body.gate_pos);

    if let Err(err) = st.gate.validate(&body.license_plate, &body.gate_pos).await {
        warn!(
            card_id = %body.card_id,
            license_plate = %body.license_plate,
            %err,
            "gate validation failed"
        );
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                message: match err {
                    GateError::Rejected { .. } => {
                        "Failed to validate car license plate".to_string()
                    }
                    GateError::Transport(_) => "Camera service unavailable".to_string(),
                },
            }),
        )
            .into_response();
    }

    let log = ScannedLog {
        card_id: body.card_id,
        license_plate: body.license_plate,
        scan_type: gate_pos.scan_type(),
        created_at: Utc::now(),
        user_id: body.user_id,
    };

    info!(card_id = %log.card_id, scan = ?log.scan_type, "gate validated");
    st.hub.read().await.publish_card_event(log.clone());

    (
        StatusCode::OK,
        Json(GateValidationResponse {
            message: "success".to_string(),
            log,
        }),
    )
        .into_response()
}
