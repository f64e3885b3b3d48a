//! Typed registration for host-initiated events.
//!
//! Each `register_*` method adapts a typed closure to the bus's loose
//! `&[Value]` handler shape, installs it as the single handler for its
//! event and announces the registration to the host with `registerHandler`.

use crate::client::{funcs, BridgeClient};
use crate::responses;
use bridge_bus::{events, Completion, EventHandler, Submission};
use bridge_types::{BridgeError, LoadContext};
use serde_json::Value;
use tracing::debug;

/// Handle given to a before-unload handler that chose to finish its work
/// asynchronously.
///
/// Calling [`ReadyToUnload::signal`] sends `readyToUnload` to the host. Only
/// the first signal has an effect.
#[derive(Debug, Clone)]
pub struct ReadyToUnload {
    completion: Completion,
}

impl ReadyToUnload {
    /// Tell the host the frame may be unloaded. Returns false if already
    /// signalled.
    pub fn signal(&self) -> bool {
        self.completion.complete()
    }

    /// True once the acknowledgment has gone out or can no longer be sent.
    #[must_use]
    pub fn is_signalled(&self) -> bool {
        self.completion.is_completed()
    }
}

impl BridgeClient {
    fn register(&self, event: &str, handler: EventHandler) -> Result<Submission, BridgeError> {
        self.bus.ensure_initialized()?;
        self.bus.register_handler(event, handler);
        debug!(event, "Registered handler");
        self.bus
            .send_message(funcs::REGISTER_HANDLER, vec![Value::from(event)])
    }

    /// Receive the new theme name whenever the user changes it.
    pub fn register_on_theme_change_handler(
        &self,
        handler: impl Fn(String) + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::THEME_CHANGE,
            EventHandler::notification(move |args| handler(responses::first_string(args))),
        )
    }

    /// Handle the host's back button.
    ///
    /// Return true if the application navigated back itself. Otherwise the
    /// host is told to `navigateBack`.
    pub fn register_back_button_handler(
        &self,
        handler: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::BACK_BUTTON_PRESS,
            EventHandler::suppressible(move |_| handler()),
        )
    }

    /// Handle an imminent unload.
    ///
    /// Return true to take over the acknowledgment and call
    /// [`ReadyToUnload::signal`] when cleanup is done. Returning false lets
    /// the host proceed immediately.
    pub fn register_before_unload_handler(
        &self,
        handler: impl Fn(ReadyToUnload) -> bool + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::BEFORE_UNLOAD,
            EventHandler::two_phase(move |_, completion| handler(ReadyToUnload { completion })),
        )
    }

    /// Run when the user opens the tab's settings.
    pub fn register_enter_settings_handler(
        &self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::CHANGE_SETTINGS,
            EventHandler::notification(move |_| handler()),
        )
    }

    /// Run when the app button is clicked.
    pub fn register_app_button_click_handler(
        &self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::APP_BUTTON_CLICK,
            EventHandler::notification(move |_| handler()),
        )
    }

    pub fn register_app_button_hover_enter_handler(
        &self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::APP_BUTTON_HOVER_ENTER,
            EventHandler::notification(move |_| handler()),
        )
    }

    pub fn register_app_button_hover_leave_handler(
        &self,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::APP_BUTTON_HOVER_LEAVE,
            EventHandler::notification(move |_| handler()),
        )
    }

    /// Handle focus moving into the frame. The argument is true when focus
    /// arrives navigating forward. Return true if the application placed
    /// focus itself.
    pub fn register_focus_enter_handler(
        &self,
        handler: impl Fn(bool) -> bool + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::FOCUS_ENTER,
            EventHandler::suppressible(move |args| handler(responses::first_bool(args))),
        )
    }

    /// Receive the entity being loaded into a cached frame.
    pub fn register_on_load_handler(
        &self,
        handler: impl Fn(LoadContext) + Send + Sync + 'static,
    ) -> Result<Submission, BridgeError> {
        self.register(
            events::LOAD,
            EventHandler::notification(move |args| {
                handler(responses::parse_load_context(args))
            }),
        )
    }
}
