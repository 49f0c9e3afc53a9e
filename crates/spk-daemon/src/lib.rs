//! spk-daemon library surface.
//!
//! Exposes the hub, routes and state modules so the scenario tests in
//! `tests/` can compose the router and drive the hub in-process.

pub mod api_types;
pub mod config;
pub mod hub;
pub mod routes;
pub mod state;
pub mod ws;
