//! # Transport Adapter
//!
//! Wraps the platform's send primitive and its inbound-message subscription.
//!
//! ## Origin acceptance
//!
//! A message is accepted when its origin equals the parent window's origin
//! or matches an entry of the explicit allow-list. With neither a parent nor
//! an allow-list no listener is installed at all ("frameless, unobserved").

use crate::codec;
use crate::config::OriginPattern;
use crate::ports::{HostPlatform, HostWindow, MessageListener};
use bridge_types::{CodecError, OutboundCall};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Where outbound frames go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPath {
    /// Posted to the parent window.
    Parent,
    /// Handed to the platform's native sink.
    Frameless,
}

/// Outbound sink plus origin filter.
pub struct TransportAdapter {
    platform: Arc<dyn HostPlatform>,
    target: RwLock<Option<Arc<dyn HostWindow>>>,
    allowed: RwLock<Vec<OriginPattern>>,
    listening: AtomicBool,
}

impl TransportAdapter {
    /// Create an unconfigured adapter.
    pub fn new(platform: Arc<dyn HostPlatform>) -> Self {
        Self {
            platform,
            target: RwLock::new(None),
            allowed: RwLock::new(Vec::new()),
            listening: AtomicBool::new(false),
        }
    }

    /// Resolve the target window, record the allow-list and subscribe to
    /// inbound messages.
    ///
    /// Re-configuring replaces the target and allow-list without
    /// subscribing twice. Returns whether a listener is installed.
    pub fn configure(&self, allowed: Vec<OriginPattern>, listener: MessageListener) -> bool {
        let target = self.platform.parent();
        let observed = target.is_some() || !allowed.is_empty();

        *self.target.write() = target;
        *self.allowed.write() = allowed;

        if !observed {
            debug!("No parent window and no allowed origins, running frameless and unobserved");
            return self.is_listening();
        }

        if !self.listening.swap(true, Ordering::SeqCst) {
            self.platform.add_message_listener(listener);
            debug!("Installed inbound message listener");
        }
        true
    }

    /// True once the inbound listener is installed.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Where sends currently go.
    #[must_use]
    pub fn send_path(&self) -> SendPath {
        match self.target.read().as_ref() {
            Some(_) => SendPath::Parent,
            None => SendPath::Frameless,
        }
    }

    /// True if a message from `origin` should be processed.
    #[must_use]
    pub fn accepts(&self, origin: &str) -> bool {
        let parent_match = self
            .target
            .read()
            .as_ref()
            .is_some_and(|target| target.origin().eq_ignore_ascii_case(origin));

        parent_match || self.allowed.read().iter().any(|p| p.matches(origin))
    }

    /// Send one frame.
    pub fn send(&self, call: &OutboundCall) -> Result<SendPath, CodecError> {
        let target = self.target.read().clone();
        match target {
            Some(target) => {
                let frame = codec::encode(call)?;
                let target_origin = target.origin();
                trace!(id = call.id, func = %call.func, origin = %target_origin, "Posting frame to parent");
                target.post_message(frame, &target_origin);
                Ok(SendPath::Parent)
            }
            None => {
                let frame = codec::encode_string(call)?;
                trace!(id = call.id, func = %call.func, "Posting frame to native sink");
                self.platform.post_frameless(frame);
                Ok(SendPath::Frameless)
            }
        }
    }

    /// Remove the listener and forget the target.
    pub fn teardown(&self) {
        if self.listening.swap(false, Ordering::SeqCst) {
            self.platform.remove_message_listener();
            debug!("Removed inbound message listener");
        }
        *self.target.write() = None;
        self.allowed.write().clear();
    }
}
