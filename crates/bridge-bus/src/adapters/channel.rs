//! Channel-backed platform adapter
//!
//! Hosts reached over an in-process channel instead of a window hierarchy
//! (native shells, test rigs, WebView bridges) plug in here. Outbound frames
//! are pushed onto an unbounded `tokio::sync::mpsc` channel; inbound
//! messages are drained sequentially by [`ChannelPlatform::run`] into the
//! listener the bus installed.

use crate::keyboard::KeyEvent;
use crate::ports::{HostPlatform, HostWindow, KeyListener, MessageListener};
use bridge_types::RawMessage;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A frame leaving the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelFrame {
    /// Posted to the host window with a target origin.
    Posted {
        /// Serialized call.
        frame: Value,
        /// Origin the frame is restricted to.
        target_origin: String,
    },
    /// Sent through the native sink while frameless.
    Native(String),
}

struct ChannelWindow {
    origin: String,
    outbound: mpsc::UnboundedSender<ChannelFrame>,
}

impl HostWindow for ChannelWindow {
    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn post_message(&self, frame: Value, target_origin: &str) {
        let frame = ChannelFrame::Posted {
            frame,
            target_origin: target_origin.to_string(),
        };
        if self.outbound.send(frame).is_err() {
            warn!("Host channel closed, dropping outbound frame");
        }
    }
}

/// [`HostPlatform`] over tokio channels.
pub struct ChannelPlatform {
    host_origin: Option<String>,
    outbound: mpsc::UnboundedSender<ChannelFrame>,
    message_listener: Mutex<Option<MessageListener>>,
    key_listener: Mutex<Option<KeyListener>>,
    print_requests: AtomicU64,
}

impl ChannelPlatform {
    /// Create a platform and the receiver carrying its outbound frames.
    ///
    /// With `host_origin` the host acts as the parent window at that origin;
    /// without it the platform is frameless and frames go out as
    /// [`ChannelFrame::Native`].
    pub fn new(
        host_origin: Option<String>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<ChannelFrame>) {
        let (outbound, receiver) = mpsc::unbounded_channel();
        let platform = Arc::new(Self {
            host_origin,
            outbound,
            message_listener: Mutex::new(None),
            key_listener: Mutex::new(None),
            print_requests: AtomicU64::new(0),
        });
        (platform, receiver)
    }

    /// Drain `inbound` into the installed listener until the sender side is
    /// dropped.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::UnboundedReceiver<RawMessage>) {
        info!("[ChannelPlatform] Started pumping inbound messages");

        while let Some(message) = inbound.recv().await {
            let listener = self.message_listener.lock().clone();
            match listener {
                Some(listener) => listener(message),
                None => debug!(origin = %message.origin, "No listener installed, dropping message"),
            }
        }

        info!("[ChannelPlatform] Inbound channel closed, stopping");
    }

    /// Forward a key event to the installed key listener.
    pub fn dispatch_key_event(&self, event: KeyEvent) {
        let listener = self.key_listener.lock().clone();
        if let Some(listener) = listener {
            listener(&event);
        }
    }

    /// Number of print requests issued.
    pub fn print_requests(&self) -> u64 {
        self.print_requests.load(Ordering::Relaxed)
    }
}

impl HostPlatform for ChannelPlatform {
    fn parent(&self) -> Option<Arc<dyn HostWindow>> {
        self.host_origin.as_ref().map(|origin| {
            Arc::new(ChannelWindow {
                origin: origin.clone(),
                outbound: self.outbound.clone(),
            }) as Arc<dyn HostWindow>
        })
    }

    fn post_frameless(&self, frame: String) {
        if self.outbound.send(ChannelFrame::Native(frame)).is_err() {
            warn!("Host channel closed, dropping outbound frame");
        }
    }

    fn add_message_listener(&self, listener: MessageListener) {
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
        self.print_requests.fetch_add(1, Ordering::Relaxed);
        debug!("Print requested");
    }
}
