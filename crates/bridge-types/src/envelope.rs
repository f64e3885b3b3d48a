//! # Message Envelope
//!
//! The shapes of every frame exchanged with the host.
//!
//! ## Wire Format
//!
//! ```text
//! outbound:  { "id": 3, "func": "getContext", "args": [], "timestamp": 1712345678901 }
//! response:  { "id": 3, "args": [ { "locale": "en-us" } ] }
//! host call: { "func": "themeChange", "args": [ "dark" ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier correlating an outbound call with its response.
pub type MessageId = u64;

/// A call sent to the host.
///
/// Immutable once built. The `id` is allocated by the correlator from a
/// monotonically increasing counter and is never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundCall {
    /// Correlation identifier.
    pub id: MessageId,
    /// Host function name.
    pub func: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Milliseconds since the Unix epoch at build time.
    pub timestamp: u64,
}

impl OutboundCall {
    /// Build a call stamped with the current time.
    #[must_use]
    pub fn new(id: MessageId, func: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id,
            func: func.into(),
            args,
            timestamp: current_timestamp_ms(),
        }
    }
}

/// An inbound frame as it appears on the wire, before classification.
///
/// Both fields are optional on the wire; whether the frame is a response or a
/// host-initiated call depends on which pending requests exist when it
/// arrives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireFrame {
    /// Response correlation id, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    /// Host function name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Response to a pending outbound call.
    Response {
        /// Id of the originating call.
        id: MessageId,
        /// Response arguments.
        args: Vec<Value>,
    },
    /// Notification or command initiated by the host.
    HostCall {
        /// Event or function name.
        func: String,
        /// Call arguments.
        args: Vec<Value>,
    },
}

impl InboundFrame {
    /// Short label for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Response { .. } => "response",
            Self::HostCall { .. } => "host_call",
        }
    }
}

/// A message as delivered by the platform's inbound-message event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMessage {
    /// Origin of the sending frame, e.g. `https://teams.microsoft.com`.
    pub origin: String,
    /// Message payload.
    pub data: Value,
}

impl RawMessage {
    /// Create a raw message.
    #[must_use]
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
