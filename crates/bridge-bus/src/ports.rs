//! # Ports
//!
//! What the bus needs from the environment it is embedded in.
//!
//! Implementations must not call back into the bus synchronously from
//! `post_message`, `post_frameless`, or the listener add/remove methods:
//! the bus invokes them while holding its state lock so that frames leave
//! in id order.

use crate::keyboard::KeyEvent;
use bridge_types::RawMessage;
use serde_json::Value;
use std::sync::Arc;

/// Callback installed for inbound messages.
pub type MessageListener = Arc<dyn Fn(RawMessage) + Send + Sync>;

/// Callback installed for key-down events.
pub type KeyListener = Arc<dyn Fn(&KeyEvent) + Send + Sync>;

/// A window frames can be posted to.
pub trait HostWindow: Send + Sync {
    /// Origin of the window, e.g. `https://teams.microsoft.com`.
    fn origin(&self) -> String;

    /// Post a frame, restricted to `target_origin`.
    fn post_message(&self, frame: Value, target_origin: &str);
}

/// The embedding environment.
pub trait HostPlatform: Send + Sync {
    /// The parent window, or `None` when running frameless.
    fn parent(&self) -> Option<Arc<dyn HostWindow>>;

    /// Native sink used when there is no parent. Receives the serialized
    /// frame.
    fn post_frameless(&self, frame: String);

    /// Install the inbound-message listener.
    fn add_message_listener(&self, listener: MessageListener);

    /// Remove the inbound-message listener.
    fn remove_message_listener(&self);

    /// Install the key-down listener.
    fn add_key_listener(&self, listener: KeyListener);

    /// Remove the key-down listener.
    fn remove_key_listener(&self);

    /// Trigger the native print action.
    fn print(&self);
}
