//! Request and response types for the spk-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded by
//! Axum and decoded by tests. No business logic lives here.

use serde::{Deserialize, Serialize};
use spk_schemas::{ParkingSlot, ScannedLog, StateOffset};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// PUT /v1/parking-slots
// ---------------------------------------------------------------------------

/// Slot-state ingestion payload from the detection hardware.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingUpdateRequest {
    pub parking_states: Vec<ParkingSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingUpdateResponse {
    /// Offset the broadcast was stamped with.
    pub offset: StateOffset,
    /// Number of slot entries accepted.
    pub accepted: usize,
}

// ---------------------------------------------------------------------------
// POST /v1/gate/validate
// ---------------------------------------------------------------------------

/// Gate-validation request. Card → vehicle resolution already happened in
/// the CRUD layer; we receive the resolved identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateValidationRequest {
    pub card_id: String,
    pub user_id: String,
    pub license_plate: String,
    /// Lane tag as sent by the hardware: `"R"` = checkin lane.
    pub gate_pos: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateValidationResponse {
    pub message: String,
    pub log: ScannedLog,
}

// ---------------------------------------------------------------------------
// Error body
// ---------------------------------------------------------------------------

/// Body for 4xx responses on validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
