//! Cross-crate scenarios. Each module drives a [`bridge_client::BridgeClient`]
//! or bare [`bridge_bus::Bus`] against a simulated host.

pub mod channel;
pub mod frameless;
pub mod handshake;
pub mod public_api;
pub mod telemetry;
