//! # Readiness Gate
//!
//! Tracks the handshake lifecycle and holds calls made while the handshake
//! is in flight.
//!
//! ```text
//! Uninitialized ──begin()──► AwaitingHandshakeResponse ──open()──► Ready
//!       ▲                                                          │
//!       └───────────────────────────reset()────────────────────────┘
//! ```
//!
//! Queued calls carry no id. Ids are allocated when the queue is flushed, so
//! ids follow send order rather than call order.

use crate::correlator::ResponseCallback;
use bridge_types::{BridgeError, MessageId};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;

/// Handshake lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitializationState {
    /// `initialize` has not been called.
    #[default]
    Uninitialized,
    /// Handshake sent, response not yet received.
    AwaitingHandshakeResponse,
    /// Handshake completed; calls are sent immediately.
    Ready,
}

impl InitializationState {
    /// Label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::AwaitingHandshakeResponse => "awaiting_handshake_response",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for InitializationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call waiting for the handshake to complete.
pub struct QueuedCall {
    /// Host function name.
    pub func: String,
    /// Positional arguments.
    pub args: Vec<Value>,
    /// Response continuation, if the caller wants one.
    pub callback: Option<ResponseCallback>,
}

impl QueuedCall {
    /// Create a queued call.
    pub fn new(
        func: impl Into<String>,
        args: Vec<Value>,
        callback: Option<ResponseCallback>,
    ) -> Self {
        Self {
            func: func.into(),
            args,
            callback,
        }
    }
}

impl fmt::Debug for QueuedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedCall")
            .field("func", &self.func)
            .field("args", &self.args)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// What to do with a call offered to the gate.
#[derive(Debug)]
pub enum Admission {
    /// Handshake complete: send now.
    SendNow(QueuedCall),
    /// Handshake in flight: held until `open()`. Carries the queue length.
    Queued(usize),
}

/// Handshake state plus the pre-handshake queue.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    state: InitializationState,
    handshake_id: Option<MessageId>,
    queue: VecDeque<QueuedCall>,
}

impl ReadinessGate {
    /// Create a gate in the `Uninitialized` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> InitializationState {
        self.state
    }

    /// Id of the handshake call, once sent.
    #[must_use]
    pub fn handshake_id(&self) -> Option<MessageId> {
        self.handshake_id
    }

    /// Error unless `initialize` has been called.
    pub fn ensure_initialized(&self) -> Result<(), BridgeError> {
        match self.state {
            InitializationState::Uninitialized => Err(BridgeError::Uninitialized),
            _ => Ok(()),
        }
    }

    /// Move to `AwaitingHandshakeResponse`.
    ///
    /// Returns false (and changes nothing) unless the gate is
    /// `Uninitialized`.
    pub fn begin(&mut self, handshake_id: MessageId) -> bool {
        if self.state != InitializationState::Uninitialized {
            return false;
        }
        self.state = InitializationState::AwaitingHandshakeResponse;
        self.handshake_id = Some(handshake_id);
        true
    }

    /// Offer a call to the gate.
    pub fn admit(&mut self, call: QueuedCall) -> Result<Admission, BridgeError> {
        match self.state {
            InitializationState::Uninitialized => Err(BridgeError::Uninitialized),
            InitializationState::AwaitingHandshakeResponse => {
                self.queue.push_back(call);
                Ok(Admission::Queued(self.queue.len()))
            }
            InitializationState::Ready => Ok(Admission::SendNow(call)),
        }
    }

    /// Move to `Ready` and drain the queue in arrival order.
    ///
    /// Opening an already-open gate returns an empty batch.
    pub fn open(&mut self) -> Vec<QueuedCall> {
        self.state = InitializationState::Ready;
        self.queue.drain(..).collect()
    }

    /// Number of calls waiting.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Return to `Uninitialized`, discarding the queue.
    pub fn reset(&mut self) {
        self.state = InitializationState::Uninitialized;
        self.handshake_id = None;
        self.queue.clear();
    }
}
