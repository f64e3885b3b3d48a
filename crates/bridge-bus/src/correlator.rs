//! # Correlator
//!
//! Owns the message-id counter and the table of pending requests.
//!
//! Flow:
//! 1. `next_call()` allocates the next id and stamps the outbound call
//! 2. `track()` records the callback(s) awaiting that id
//! 3. `resolve()` removes the entry and hands back a [`Delivery`]
//! 4. The caller releases its lock and runs `Delivery::deliver()`
//!
//! Callbacks never run while the table is borrowed, so a callback may issue
//! new calls without disturbing the resolution in progress.

use bridge_types::{MessageId, OutboundCall};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Continuation invoked with the response arguments of a call.
pub type ResponseCallback = Box<dyn FnOnce(&[Value]) + Send>;

/// How long a pending entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Removed after the first response.
    Once,
    /// Kept after the first response; later callbacks are answered
    /// immediately with the recorded arguments. Used for the handshake.
    Retain,
}

struct PendingRequest {
    func: String,
    callbacks: Vec<ResponseCallback>,
    retention: Retention,
    resolved: Option<Vec<Value>>,
}

/// Callbacks ready to run, detached from the pending table.
#[must_use = "callbacks only run when `deliver` is called"]
pub struct Delivery {
    id: MessageId,
    callbacks: Vec<ResponseCallback>,
    args: Vec<Value>,
}

impl Delivery {
    /// Id the response belongs to.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Number of callbacks that will run.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// True if there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invoke every callback in registration order.
    pub fn deliver(self) {
        let Self {
            id,
            callbacks,
            args,
        } = self;
        trace!(id, callbacks = callbacks.len(), "Delivering response");
        for callback in callbacks {
            callback(&args);
        }
    }
}

/// Request/response correlation table.
pub struct Correlator {
    next_id: MessageId,
    pending: HashMap<MessageId, PendingRequest>,
}

impl Correlator {
    /// Create a correlator whose first id is 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
        }
    }

    /// Allocate the next id and build the call.
    pub fn next_call(&mut self, func: impl Into<String>, args: Vec<Value>) -> OutboundCall {
        let id = self.next_id;
        self.next_id += 1;
        OutboundCall::new(id, func, args)
    }

    /// Record a pending request for `id`.
    ///
    /// With `Retention::Once` and no callback nothing is recorded: the call
    /// is fire-and-forget.
    pub fn track(
        &mut self,
        call: &OutboundCall,
        callback: Option<ResponseCallback>,
        retention: Retention,
    ) {
        if callback.is_none() && retention == Retention::Once {
            return;
        }
        self.pending.insert(
            call.id,
            PendingRequest {
                func: call.func.clone(),
                callbacks: callback.into_iter().collect(),
                retention,
                resolved: None,
            },
        );
    }

    /// Append a callback to an existing entry.
    ///
    /// Returns a delivery when the entry was already resolved and retained,
    /// so the caller can run the callback right away.
    pub fn add_callback(&mut self, id: MessageId, callback: ResponseCallback) -> Option<Delivery> {
        let Some(entry) = self.pending.get_mut(&id) else {
            debug!(id, "Callback added for unknown id, dropping");
            return None;
        };

        match &entry.resolved {
            Some(args) => Some(Delivery {
                id,
                callbacks: vec![callback],
                args: args.clone(),
            }),
            None => {
                entry.callbacks.push(callback);
                None
            }
        }
    }

    /// True if a response for `id` would be delivered.
    #[must_use]
    pub fn is_pending(&self, id: MessageId) -> bool {
        self.pending
            .get(&id)
            .is_some_and(|entry| entry.resolved.is_none())
    }

    /// Detach the callbacks waiting on `id`.
    ///
    /// Returns `None` for unknown ids and for duplicate responses to an
    /// already-resolved retained entry.
    pub fn resolve(&mut self, id: MessageId, args: Vec<Value>) -> Option<Delivery> {
        let entry = self.pending.get_mut(&id)?;
        if entry.resolved.is_some() {
            return None;
        }

        let callbacks = std::mem::take(&mut entry.callbacks);
        trace!(id, func = %entry.func, "Resolving pending request");

        match entry.retention {
            Retention::Retain => entry.resolved = Some(args.clone()),
            Retention::Once => {
                self.pending.remove(&id);
            }
        }

        Some(Delivery {
            id,
            callbacks,
            args,
        })
    }

    /// Arguments recorded for a retained, resolved entry.
    #[must_use]
    pub fn resolved_args(&self, id: MessageId) -> Option<&[Value]> {
        self.pending
            .get(&id)
            .and_then(|entry| entry.resolved.as_deref())
    }

    /// Number of entries still awaiting a response.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|entry| entry.resolved.is_none())
            .count()
    }

    /// Id the next call will receive.
    #[must_use]
    pub fn peek_next_id(&self) -> MessageId {
        self.next_id
    }

    /// Drop every entry and restart ids at 0.
    pub fn reset(&mut self) {
        self.next_id = 0;
        self.pending.clear();
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}
