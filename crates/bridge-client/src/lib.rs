//! # Bridge Client
//!
//! Typed API for embedded content talking to its host frame.
//!
//! [`BridgeClient`] wraps a shared [`bridge_bus::Bus`] and exposes the host
//! functions as typed methods:
//!
//! - initialization, optionally announcing the frame's URLs
//! - context, deep link and tab instance queries
//! - typed registration for host events (theme, back button, unload, ...)
//! - the print shortcut
//!
//! ```text
//! app ──► BridgeClient ──► Bus ──► host
//!  ▲                        │
//!  └──── typed callbacks ◄──┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod handlers;
pub mod responses;

pub use client::{
    funcs, BridgeClient, CompletionCallback, GenericCompletionHandler, InitializeCallback,
};
pub use handlers::ReadyToUnload;
