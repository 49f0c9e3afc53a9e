//! spk-gate
//!
//! HTTP client for the external camera / plate-recognition service that
//! authorizes gate events.
//!
//! The camera service receives the license plate read at a gate lane and
//! answers `valid` or `invalid`. Only a `valid` answer may produce a
//! [`ScannedLog`](spk_schemas::ScannedLog) and any broadcast; every failure
//! mode here surfaces to the gate-validation caller and triggers nothing
//! downstream.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use spk_schemas::CardScanType;

/// Default request timeout toward the camera service.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Gate position
// ---------------------------------------------------------------------------

/// Which lane a scan came from. The hardware tags the checkin lane `"R"`;
/// every other tag is the checkout lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GatePos {
    Checkin,
    Checkout,
}

impl GatePos {
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim() == "R" {
            GatePos::Checkin
        } else {
            GatePos::Checkout
        }
    }

    pub fn scan_type(self) -> CardScanType {
        match self {
            GatePos::Checkin => CardScanType::Checkin,
            GatePos::Checkout => CardScanType::Checkout,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Gate validation failure taxonomy.
///
/// `Rejected` and `Transport` are deliberately distinct: a rejected plate is
/// a normal business outcome, a transport failure is an operational one, but
/// neither produces a log or a broadcast.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("camera service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("plate {plate_number} rejected by camera service")]
    Rejected { plate_number: String },
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ScanRequest<'a> {
    plate_number: &'a str,
    gate_pos: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    status: String,
}

// ---------------------------------------------------------------------------
// GateClient
// ---------------------------------------------------------------------------

/// Client for the plate-recognition endpoint.
///
/// Cheap to clone (reqwest pools connections internally). The timeout lives
/// on the underlying client so a hung camera cannot wedge gate processing
/// past the configured bound.
#[derive(Clone, Debug)]
pub struct GateClient {
    http: reqwest::Client,
    base_url: String,
}

impl GateClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn validate_url(&self) -> String {
        format!("{}/cards/validate", self.base_url.trim_end_matches('/'))
    }

    /// Ask the camera service whether `plate_number` seen at `gate_tag` may
    /// pass. `Ok(())` means the plate matched; any other outcome is an error
    /// the caller surfaces without publishing anything.
    pub async fn validate(&self, plate_number: &str, gate_tag: &str) -> Result<(), GateError> {
        let response = self
            .http
            .post(self.validate_url())
            .json(&ScanRequest {
                plate_number,
                gate_pos: gate_tag,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: ScanResponse = response.json().await?;
        if body.status == "valid" {
            Ok(())
        } else {
            Err(GateError::Rejected {
                plate_number: plate_number.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> GateClient {
        GateClient::new(server.base_url(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn gate_pos_r_is_checkin_everything_else_checkout() {
        assert_eq!(GatePos::from_tag("R"), GatePos::Checkin);
        assert_eq!(GatePos::from_tag(" R "), GatePos::Checkin);
        assert_eq!(GatePos::from_tag("L"), GatePos::Checkout);
        assert_eq!(GatePos::from_tag(""), GatePos::Checkout);
        assert_eq!(GatePos::Checkin.scan_type(), CardScanType::Checkin);
        assert_eq!(GatePos::Checkout.scan_type(), CardScanType::Checkout);
    }

    #[tokio::test]
    async fn valid_status_passes() {
        let server = MockServer::start_async().await;
        let mock = server
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

        let client = client_for(&server);
        client.validate("51A-123.45", "R").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/cards/validate");
                then.status(200)
                    .json_body(serde_json::json!({"status": "invalid"}));
            })
            .await;

        let client = client_for(&server);
        let err = client.validate("00X-000.00", "L").await.unwrap_err();
        assert!(matches!(err, GateError::Rejected { .. }));
    }

    #[tokio::test]
    async fn http_error_is_a_transport_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/cards/validate");
                then.status(500);
            })
            .await;

        let client = client_for(&server);
        let err = client.validate("51A-123.45", "R").await.unwrap_err();
        assert!(matches!(err, GateError::Transport(_)));
    }
}
