//! # Bridge Bus
//!
//! Message correlation and dispatch between an embedded client and its host
//! frame.
//!
//! The platform's messaging primitive is asynchronous, unordered and
//! string-addressed. On top of it this crate provides:
//!
//! - request/response calls with callback semantics ([`Correlator`])
//! - a readiness handshake that queues calls until the host is listening
//!   ([`ReadinessGate`])
//! - dispatch of host-initiated events, including events whose default host
//!   action a handler may suppress or defer ([`EventDispatcher`])
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────── Bus ────────────────────────────┐
//! │  ReadinessGate ──► Correlator ──► Codec ──► TransportAdapter │──► HostPlatform
//! │                        ▲                        │            │
//! │  EventDispatcher ◄── classify ◄── decode ◄──────┘            │◄── inbound
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The environment is reached through the [`HostPlatform`] and
//! [`HostWindow`] ports. [`adapters::ChannelPlatform`] implements them over
//! tokio channels; the `testing` module (feature `test-utils`) provides a
//! recording mock.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod bus;
pub mod codec;
pub mod config;
pub mod correlator;
pub mod dispatcher;
pub mod keyboard;
pub mod metrics;
pub mod ports;
pub mod readiness;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use bus::{Bus, Submission, WeakBus};
pub use config::{BusConfig, ConfigError, OriginPattern};
pub use correlator::{Correlator, Delivery, ResponseCallback, Retention};
pub use dispatcher::{
    Completion, DispatchOutcome, EventDispatcher, EventHandler, EventPolicy, NotificationHandler,
    SuppressibleHandler, TwoPhaseHandler,
};
pub use keyboard::KeyEvent;
pub use metrics::{BusMetrics, CountingMetrics, DropReason, MetricsSnapshot, NoOpMetrics};
pub use ports::{HostPlatform, HostWindow, KeyListener, MessageListener};
pub use readiness::{InitializationState, QueuedCall, ReadinessGate};
pub use transport::{SendPath, TransportAdapter};

/// Host function names known to the library.
pub mod funcs {
    /// Handshake.
    pub const INITIALIZE: &str = "initialize";
    /// Default action for an unhandled back-button press.
    pub const NAVIGATE_BACK: &str = "navigateBack";
    /// Acknowledgment for a before-unload request.
    pub const READY_TO_UNLOAD: &str = "readyToUnload";

    pub const GET_CONTEXT: &str = "getContext";
    pub const EXECUTE_DEEP_LINK: &str = "executeDeepLink";
    pub const SHARE_DEEP_LINK: &str = "shareDeepLink";
    pub const SET_FRAME_CONTEXT: &str = "setFrameContext";
    pub const GET_TAB_INSTANCES: &str = "getTabInstances";
    pub const GET_MRU_TAB_INSTANCES: &str = "getMruTabInstances";
    pub const REGISTER_HANDLER: &str = "registerHandler";

    /// Label used for any function not listed in [`KNOWN`].
    pub const OTHER: &str = "other";

    /// Every name above.
    pub const KNOWN: &[&str] = &[
        INITIALIZE,
        NAVIGATE_BACK,
        READY_TO_UNLOAD,
        GET_CONTEXT,
        EXECUTE_DEEP_LINK,
        SHARE_DEEP_LINK,
        SET_FRAME_CONTEXT,
        GET_TAB_INSTANCES,
        GET_MRU_TAB_INSTANCES,
        REGISTER_HANDLER,
    ];

    /// `func` if it is a known name, else [`OTHER`]. Keeps metric label
    /// sets bounded.
    #[must_use]
    pub fn metric_label(func: &str) -> &'static str {
        KNOWN
            .iter()
            .copied()
            .find(|known| *known == func)
            .unwrap_or(OTHER)
    }
}

/// Host-initiated event names with built-in policies or typed wrappers.
pub mod events {
    pub const BACK_BUTTON_PRESS: &str = "backButtonPress";
    pub const BEFORE_UNLOAD: &str = "beforeUnload";
    pub const FOCUS_ENTER: &str = "focusEnter";
    pub const THEME_CHANGE: &str = "themeChange";
    pub const CHANGE_SETTINGS: &str = "changeSettings";
    pub const APP_BUTTON_CLICK: &str = "appButtonClick";
    pub const APP_BUTTON_HOVER_ENTER: &str = "appButtonHoverEnter";
    pub const APP_BUTTON_HOVER_LEAVE: &str = "appButtonHoverLeave";
    pub const LOAD: &str = "load";
}
