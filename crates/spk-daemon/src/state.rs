//! Shared runtime state for spk-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum; this module owns
//! nothing async itself.

use std::sync::Arc;

use spk_gate::GateClient;
use tokio::sync::RwLock;

use crate::config::DaemonConfig;
use crate::hub::SocketHub;

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The socket hub; every mutation is a short critical section.
    pub hub: Arc<RwLock<SocketHub>>,
    /// Camera / plate-recognition client.
    pub gate: GateClient,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(config: &DaemonConfig) -> anyhow::Result<Self> {
        let gate = GateClient::new(config.camera_url.clone(), config.gate_timeout)?;
        Ok(Self {
            hub: Arc::new(RwLock::new(SocketHub::new())),
            gate,
            build: BuildInfo {
                service: "spk-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        })
    }
}
