//! # Test Harness
//!
//! An in-memory [`HostPlatform`] that records every frame the bus posts and
//! lets a test play the host's side of the conversation.
//!
//! ```ignore
//! let platform = MockPlatform::new();
//! let bus = Bus::new(platform.clone(), BusConfig::default())?;
//! platform.initialize_with_context(&bus, "content", None);
//!
//! bus.send_message("getContext", vec![])?;
//! let call = platform.find_message_by_func("getContext").unwrap();
//! platform.respond_to_message(&call, vec![json!({ "locale": "en-us" })]);
//! ```

use crate::bus::Bus;
use crate::funcs;
use crate::keyboard::KeyEvent;
use crate::ports::{HostPlatform, HostWindow, KeyListener, MessageListener};
use bridge_types::{OutboundCall, RawMessage};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Origin of the simulated host window.
pub const PARENT_ORIGIN: &str = "https://teams.microsoft.com";

type MessageLog = Arc<Mutex<Vec<OutboundCall>>>;

/// Parent window that records posted frames.
pub struct RecordingWindow {
    origin: String,
    log: MessageLog,
}

impl HostWindow for RecordingWindow {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn post_message(&self, frame: Value, _target_origin: &str) {
        if let Ok(call) = serde_json::from_value(frame) {
            self.log.lock().push(call);
        }
    }
}

/// Recording platform.
pub struct MockPlatform {
    parent: Option<Arc<RecordingWindow>>,
    messages: MessageLog,
    message_listener: Mutex<Option<MessageListener>>,
    key_listener: Mutex<Option<KeyListener>>,
    listener_installs: AtomicUsize,
    prints: AtomicUsize,
}

impl MockPlatform {
    /// Platform embedded in a parent at [`PARENT_ORIGIN`].
    pub fn new() -> Arc<Self> {
        Self::with_parent_origin(PARENT_ORIGIN)
    }

    /// Platform embedded in a parent at `origin`.
    pub fn with_parent_origin(origin: &str) -> Arc<Self> {
        let messages = MessageLog::default();
        Arc::new(Self::build(
            Some(Arc::new(RecordingWindow {
                origin: origin.to_string(),
                log: messages.clone(),
            })),
            messages,
        ))
    }

    /// Platform with no parent window.
    pub fn frameless() -> Arc<Self> {
        Arc::new(Self::build(None, MessageLog::default()))
    }

    fn build(parent: Option<Arc<RecordingWindow>>, messages: MessageLog) -> Self {
        Self {
            parent,
            messages,
            message_listener: Mutex::new(None),
            key_listener: Mutex::new(None),
            listener_installs: AtomicUsize::new(0),
            prints: AtomicUsize::new(0),
        }
    }

    fn reply_origin(&self) -> String {
        self.parent
            .as_ref()
            .map_or_else(|| PARENT_ORIGIN.to_string(), |p| p.origin.clone())
    }

    // -------------------------------------------------------------------------
    // Outbound inspection
    // -------------------------------------------------------------------------

    /// Every frame posted so far, in send order.
    pub fn messages(&self) -> Vec<OutboundCall> {
        self.messages.lock().clone()
    }

    /// Number of frames posted.
    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    /// First frame calling `func`.
    pub fn find_message_by_func(&self, func: &str) -> Option<OutboundCall> {
        self.messages.lock().iter().find(|m| m.func == func).cloned()
    }

    /// Every frame calling `func`.
    pub fn find_messages_by_func(&self, func: &str) -> Vec<OutboundCall> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.func == func)
            .cloned()
            .collect()
    }

    /// Forget recorded frames.
    pub fn clear_messages(&self) {
        self.messages.lock().clear();
    }

    // -------------------------------------------------------------------------
    // Inbound simulation
    // -------------------------------------------------------------------------

    /// True while an inbound listener is installed.
    pub fn has_listener(&self) -> bool {
        self.message_listener.lock().is_some()
    }

    /// How many times a listener has been installed.
    pub fn listener_installs(&self) -> usize {
        self.listener_installs.load(Ordering::SeqCst)
    }

    /// Feed a raw message to the installed listener. Returns false when no
    /// listener is installed.
    pub fn process_message(&self, raw: RawMessage) -> bool {
        let listener = self.message_listener.lock().clone();
        match listener {
            Some(listener) => {
                listener(raw);
                true
            }
            None => false,
        }
    }

    /// Answer `message` from the parent's origin.
    pub fn respond_to_message(&self, message: &OutboundCall, args: Vec<Value>) -> bool {
        self.respond_from(&self.reply_origin(), message, args)
    }

    /// Answer `message` from `origin`.
    pub fn respond_from(&self, origin: &str, message: &OutboundCall, args: Vec<Value>) -> bool {
        self.process_message(RawMessage::new(
            origin,
            json!({ "id": message.id, "args": args }),
        ))
    }

    /// Simulate a host-initiated call.
    pub fn send_message(&self, func: &str, args: Vec<Value>) -> bool {
        self.process_message(RawMessage::new(
            self.reply_origin(),
            json!({ "func": func, "args": args }),
        ))
    }

    /// Initialize `bus` and answer the handshake with `frame_context` and an
    /// optional host client type. Returns the handshake frame.
    pub fn initialize_with_context(
        &self,
        bus: &Bus,
        frame_context: &str,
        host_client_type: Option<&str>,
    ) -> Option<OutboundCall> {
        bus.initialize(None, None);
        let init = self.find_message_by_func(funcs::INITIALIZE)?;
        let mut args = vec![json!(frame_context)];
        if let Some(host_client_type) = host_client_type {
            args.push(json!(host_client_type));
        }
        self.respond_to_message(&init, args);
        Some(init)
    }

    // -------------------------------------------------------------------------
    // Keyboard and print
    // -------------------------------------------------------------------------

    /// True while a key listener is installed.
    pub fn has_key_listener(&self) -> bool {
        self.key_listener.lock().is_some()
    }

    /// Feed a key event to the installed key listener.
    pub fn dispatch_key_event(&self, event: KeyEvent) -> bool {
        let listener = self.key_listener.lock().clone();
        match listener {
            Some(listener) => {
                listener(&event);
                true
            }
            None => false,
        }
    }

    /// Number of times the print action ran.
    pub fn print_count(&self) -> usize {
        self.prints.load(Ordering::SeqCst)
    }
}

impl HostPlatform for MockPlatform {
    fn parent(&self) -> Option<Arc<dyn HostWindow>> {
        self.parent
            .clone()
            .map(|parent| parent as Arc<dyn HostWindow>)
    }

    fn post_frameless(&self, frame: String) {
        if let Ok(call) = serde_json::from_str(&frame) {
            self.messages.lock().push(call);
        }
    }

    fn add_message_listener(&self, listener: MessageListener) {
        self.listener_installs.fetch_add(1, Ordering::SeqCst);
        *self.message_listener.lock() = Some(listener);
    }

    fn remove_message_listener(&self) {
        self.message_listener.lock().take();
    }

    fn add_key_listener(&self, listener: KeyListener) {
        *self.key_listener.lock() = Some(listener);
    }

    fn remove_key_listener(&self) {
        self.key_listener.lock().take();
    }

    fn print(&self) {
        self.prints.fetch_add(1, Ordering::SeqCst);
    }
}
