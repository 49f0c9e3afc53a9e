//! Daemon configuration from environment variables.
//!
//! `main.rs` loads `.env.local` first (dev convenience); production injects
//! env vars directly. Everything has a local-dev default so `cargo run`
//! works out of the box.

use std::net::SocketAddr;
use std::time::Duration;

use spk_gate::DEFAULT_TIMEOUT;

#[derive(Clone, Debug)]
pub struct DaemonConfig {
    /// HTTP/WebSocket bind address (`SPK_DAEMON_ADDR`).
    pub bind_addr: SocketAddr,
    /// Base URL of the camera / plate-recognition service (`SPK_CAMERA_URL`).
    pub camera_url: String,
    /// Timeout for camera-service requests (`SPK_GATE_TIMEOUT_SECS`).
    pub gate_timeout: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            camera_url: "http://127.0.0.1:8000/api/v1".to_string(),
            gate_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("SPK_DAEMON_ADDR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.bind_addr),
            camera_url: std::env::var("SPK_CAMERA_URL").unwrap_or(defaults.camera_url),
            gate_timeout: std::env::var("SPK_GATE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.gate_timeout),
        }
    }
}
