//! # Bus
//!
//! The single integration point composing the transport, codec, correlator,
//! readiness gate and event dispatcher.
//!
//! ## Locking
//!
//! All mutable state lives behind one `parking_lot::Mutex`. Frames are
//! handed to the transport while the lock is held, so they leave in id
//! order. Application callbacks and handlers always run after the lock is
//! released, so they may call back into the bus freely.
//!
//! ## Handshake
//!
//! ```text
//! initialize() ──► "initialize" [version] ──► host
//!                                              │
//! host response ──► internal completion ──► Ready + flush queue
//!                         └──► application callbacks (registration order)
//! ```

use crate::codec;
use crate::config::{BusConfig, ConfigError, OriginPattern};
use crate::correlator::{Correlator, Delivery, ResponseCallback, Retention};
use crate::dispatcher::{self, Completion, DispatchOutcome, EventDispatcher, EventHandler, EventPolicy};
use crate::funcs;
use crate::keyboard::KeyEvent;
use crate::metrics::{BusMetrics, DropReason, NoOpMetrics};
use crate::ports::{HostPlatform, KeyListener, MessageListener};
use crate::readiness::{Admission, InitializationState, QueuedCall, ReadinessGate};
use crate::transport::{SendPath, TransportAdapter};
use bridge_types::{BridgeError, InboundFrame, MessageId, RawMessage};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

/// What happened to a call handed to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Sent immediately with this id.
    Sent(MessageId),
    /// Held until the handshake completes. Carries the queue length.
    Queued(usize),
}

impl Submission {
    /// Id of the sent frame, if it was sent.
    #[must_use]
    pub fn id(&self) -> Option<MessageId> {
        match self {
            Self::Sent(id) => Some(*id),
            Self::Queued(_) => None,
        }
    }
}

#[derive(Default)]
struct BusState {
    correlator: Correlator,
    gate: ReadinessGate,
    dispatcher: EventDispatcher,
    /// Frame context passed to `initialize`.
    requested_frame_context: Option<String>,
    /// Effective frame context after the handshake.
    frame_context: Option<String>,
    print_enabled: bool,
    /// Bumped by teardown so stale completions become inert.
    generation: u64,
}

struct BusInner {
    config: BusConfig,
    origins: Vec<OriginPattern>,
    platform: Arc<dyn HostPlatform>,
    transport: TransportAdapter,
    metrics: Arc<dyn BusMetrics>,
    state: Mutex<BusState>,
}

/// Message correlation and dispatch bus.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

/// Non-owning handle to a [`Bus`].
///
/// Callbacks stored inside the bus hold this instead of a `Bus` so they do
/// not keep it alive.
#[derive(Clone)]
pub struct WeakBus {
    inner: Weak<BusInner>,
}

impl WeakBus {
    /// The bus, if it still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Bus> {
        self.inner.upgrade().map(|inner| Bus { inner })
    }
}

impl Bus {
    /// Create a bus over `platform`.
    pub fn new(platform: Arc<dyn HostPlatform>, config: BusConfig) -> Result<Self, ConfigError> {
        Self::with_metrics(platform, config, Arc::new(NoOpMetrics))
    }

    /// Create a bus reporting to `metrics`.
    pub fn with_metrics(
        platform: Arc<dyn HostPlatform>,
        config: BusConfig,
        metrics: Arc<dyn BusMetrics>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let origins = config.origin_patterns()?;
        Ok(Self {
            inner: Arc::new(BusInner {
                transport: TransportAdapter::new(platform.clone()),
                config,
                origins,
                platform,
                metrics,
                state: Mutex::new(BusState::default()),
            }),
        })
    }

    /// Non-owning handle to this bus.
    #[must_use]
    pub fn downgrade(&self) -> WeakBus {
        WeakBus {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Configuration the bus was built with.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    /// Current handshake state.
    #[must_use]
    pub fn state(&self) -> InitializationState {
        self.inner.state.lock().gate.state()
    }

    /// Error unless `initialize` has been called.
    pub fn ensure_initialized(&self) -> Result<(), BridgeError> {
        self.inner.state.lock().gate.ensure_initialized()
    }

    // =========================================================================
    // Handshake
    // =========================================================================

    /// Start the handshake, or attach `callback` to it.
    ///
    /// Only the first call sends a frame. Callbacks given before the host
    /// answers run together, in order, when it does. Callbacks given after
    /// run immediately with the recorded handshake response.
    pub fn initialize(&self, frame_context: Option<&str>, callback: Option<ResponseCallback>) {
        let mut state = self.inner.state.lock();

        if state.gate.state() != InitializationState::Uninitialized {
            let delivery = match (state.gate.handshake_id(), callback) {
                (Some(id), Some(callback)) => state.correlator.add_callback(id, callback),
                _ => None,
            };
            drop(state);
            if let Some(delivery) = delivery {
                delivery.deliver();
            }
            return;
        }

        let call = state
            .correlator
            .next_call(funcs::INITIALIZE, vec![Value::from(self.inner.config.version.clone())]);
        state.gate.begin(call.id);
        state.requested_frame_context = frame_context.map(str::to_string);

        let listening = self
            .inner
            .transport
            .configure(self.inner.origins.clone(), self.message_listener());

        let weak = self.downgrade();
        let completion: ResponseCallback = Box::new(move |args: &[Value]| {
            if let Some(bus) = weak.upgrade() {
                bus.complete_handshake(args);
            }
        });
        state.correlator.track(&call, Some(completion), Retention::Retain);
        if let Some(callback) = callback {
            // Entry was just created, so this never yields a delivery.
            let _ = state.correlator.add_callback(call.id, callback);
        }

        info!(
            id = call.id,
            version = %self.inner.config.version,
            listening,
            "Starting handshake"
        );
        self.inner.transmit(&call);
    }

    fn complete_handshake(&self, args: &[Value]) {
        let mut state = self.inner.state.lock();

        let effective = args
            .first()
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| state.requested_frame_context.clone())
            .or_else(|| self.inner.config.default_frame_context.clone());
        state.frame_context = effective;

        let queued = state.gate.open();
        let flushed = queued.len();
        for call in queued {
            self.inner.send_now(&mut state, call);
        }

        info!(
            frame_context = ?state.frame_context,
            flushed,
            "Handshake completed"
        );
        self.inner.metrics.record_handshake_completed();
        self.inner.metrics.record_queue_flushed(flushed);
    }

    /// Effective frame context once the handshake has completed.
    #[must_use]
    pub fn frame_context(&self) -> Option<String> {
        self.inner.state.lock().frame_context.clone()
    }

    /// Arguments of the handshake response, once received.
    #[must_use]
    pub fn handshake_response(&self) -> Option<Vec<Value>> {
        let state = self.inner.state.lock();
        let id = state.gate.handshake_id()?;
        state.correlator.resolved_args(id).map(<[Value]>::to_vec)
    }

    // =========================================================================
    // Outbound calls
    // =========================================================================

    /// Send `func(args)`, invoking `callback` with the response arguments.
    ///
    /// Fails with [`BridgeError::Uninitialized`] before `initialize`. While
    /// the handshake is in flight the call is queued and receives its id
    /// when flushed.
    pub fn send_with_callback(
        &self,
        func: &str,
        args: Vec<Value>,
        callback: Option<ResponseCallback>,
    ) -> Result<Submission, BridgeError> {
        let mut state = self.inner.state.lock();
        match state.gate.admit(QueuedCall::new(func, args, callback))? {
            Admission::SendNow(call) => Ok(Submission::Sent(self.inner.send_now(&mut state, call))),
            Admission::Queued(len) => {
                debug!(func, queued = len, "Queued call until handshake completes");
                self.inner.metrics.record_call_queued();
                Ok(Submission::Queued(len))
            }
        }
    }

    /// Send `func(args)` without expecting a response.
    pub fn send_message(&self, func: &str, args: Vec<Value>) -> Result<Submission, BridgeError> {
        self.send_with_callback(func, args, None)
    }

    // =========================================================================
    // Inbound frames
    // =========================================================================

    fn message_listener(&self) -> MessageListener {
        let weak = self.downgrade();
        Arc::new(move |raw: RawMessage| {
            if let Some(bus) = weak.upgrade() {
                bus.handle_message(raw);
            }
        })
    }

    /// Process one inbound message from the platform.
    ///
    /// Frames from unaccepted origins, malformed frames and responses with
    /// no pending request are dropped silently.
    pub fn handle_message(&self, raw: RawMessage) {
        if !self.inner.transport.accepts(&raw.origin) {
            trace!(origin = %raw.origin, "Dropping frame from unaccepted origin");
            self.inner.metrics.record_frame_dropped(DropReason::Origin);
            return;
        }

        let frame = match codec::decode(&raw.data) {
            Ok(frame) => frame,
            Err(e) => {
                trace!(origin = %raw.origin, error = %e, "Dropping malformed frame");
                self.inner.metrics.record_frame_dropped(DropReason::Malformed);
                return;
            }
        };

        let classified = {
            let state = self.inner.state.lock();
            codec::classify(frame, |id| state.correlator.is_pending(id))
        };

        match classified {
            Some(frame) => {
                self.inner.metrics.record_frame_received(frame.kind());
                match frame {
                    InboundFrame::Response { id, args } => {
                        self.resolve(id, args);
                    }
                    InboundFrame::HostCall { func, args } => {
                        self.dispatch(&func, &args);
                    }
                }
            }
            None => {
                trace!(origin = %raw.origin, "Dropping unmatched frame");
                self.inner.metrics.record_frame_dropped(DropReason::Unmatched);
            }
        }
    }

    /// Deliver a response to the callbacks waiting on `id`.
    ///
    /// Returns false when nothing was waiting.
    pub fn resolve(&self, id: MessageId, args: Vec<Value>) -> bool {
        let delivery: Option<Delivery> = self.inner.state.lock().correlator.resolve(id, args);
        match delivery {
            Some(delivery) => {
                delivery.deliver();
                true
            }
            None => {
                trace!(id, "No pending request for response");
                false
            }
        }
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// Install `handler` as the only handler for `event`.
    pub fn register_handler(&self, event: &str, handler: EventHandler) {
        self.inner.state.lock().dispatcher.register(event, handler);
    }

    /// Add `handler` alongside existing handlers for `event`.
    pub fn add_listener(&self, event: &str, handler: EventHandler) {
        self.inner.state.lock().dispatcher.add_listener(event, handler);
    }

    /// Remove every handler for `event`.
    pub fn unregister_handler(&self, event: &str) -> bool {
        self.inner.state.lock().dispatcher.unregister(event)
    }

    /// True if `event` has a handler.
    #[must_use]
    pub fn has_handler(&self, event: &str) -> bool {
        self.inner.state.lock().dispatcher.has_handler(event)
    }

    /// Run the handlers for a host call and apply the event's default
    /// policy.
    pub fn dispatch(&self, event: &str, args: &[Value]) -> DispatchOutcome {
        let (handlers, generation) = {
            let state = self.inner.state.lock();
            (state.dispatcher.handlers(event), state.generation)
        };
        let policy = EventPolicy::for_event(event);

        let outcome = dispatcher::invoke(policy, &handlers, args, || {
            self.deferred_acknowledgment(policy, generation)
        });
        debug!(event, handlers = handlers.len(), ?outcome, "Dispatched host call");

        if let DispatchOutcome::DefaultAction(func) = outcome {
            self.send_default_action(func);
        }
        outcome
    }

    fn deferred_acknowledgment(&self, policy: EventPolicy, generation: u64) -> Completion {
        let EventPolicy::TwoPhase { acknowledgment } = policy else {
            return Completion::new(|| {});
        };
        let weak = self.downgrade();
        Completion::new(move || {
            let Some(bus) = weak.upgrade() else {
                return;
            };
            if bus.inner.state.lock().generation != generation {
                debug!(func = acknowledgment, "Ignoring completion from a torn-down session");
                return;
            }
            bus.send_default_action(acknowledgment);
        })
    }

    fn send_default_action(&self, func: &'static str) {
        match self.send_message(func, Vec::new()) {
            Ok(_) => self.inner.metrics.record_default_action(func),
            Err(e) => warn!(func, error = %e, "Could not send default action"),
        }
    }

    // =========================================================================
    // Print capability
    // =========================================================================

    /// Install the print keyboard shortcut. Idempotent.
    pub fn enable_print_capability(&self) -> Result<(), BridgeError> {
        let mut state = self.inner.state.lock();
        state.gate.ensure_initialized()?;
        if state.print_enabled {
            return Ok(());
        }
        state.print_enabled = true;

        let weak = self.downgrade();
        let listener: KeyListener = Arc::new(move |event: &KeyEvent| {
            if !event.is_print_shortcut() {
                return;
            }
            if let Some(bus) = weak.upgrade() {
                bus.print();
            }
        });
        self.inner.platform.add_key_listener(listener);
        debug!("Print capability enabled");
        Ok(())
    }

    /// True once the print shortcut is installed.
    #[must_use]
    pub fn is_print_enabled(&self) -> bool {
        self.inner.state.lock().print_enabled
    }

    /// Invoke the platform print action.
    pub fn print(&self) {
        self.inner.platform.print();
    }

    // =========================================================================
    // Introspection and teardown
    // =========================================================================

    /// Requests still awaiting a response.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.state.lock().correlator.pending_count()
    }

    /// Calls held by the readiness gate.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.inner.state.lock().gate.queued_len()
    }

    /// True once the inbound listener is installed.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.inner.transport.is_listening()
    }

    /// Where outbound frames currently go.
    #[must_use]
    pub fn send_path(&self) -> SendPath {
        self.inner.transport.send_path()
    }

    /// Reset every piece of state and remove installed listeners.
    ///
    /// Intended for test isolation.
    pub fn teardown(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.print_enabled {
                self.inner.platform.remove_key_listener();
            }
            state.correlator.reset();
            state.gate.reset();
            state.dispatcher.clear();
            state.requested_frame_context = None;
            state.frame_context = None;
            state.print_enabled = false;
            state.generation += 1;
        }
        self.inner.transport.teardown();
        debug!("Bus torn down");
    }
}

impl BusInner {
    fn send_now(&self, state: &mut BusState, call: QueuedCall) -> MessageId {
        let QueuedCall {
            func,
            args,
            callback,
        } = call;
        let outbound = state.correlator.next_call(func, args);
        state.correlator.track(&outbound, callback, Retention::Once);
        self.transmit(&outbound);
        outbound.id
    }

    fn transmit(&self, call: &bridge_types::OutboundCall) {
        match self.transport.send(call) {
            Ok(path) => {
                debug!(id = call.id, func = %call.func, ?path, "Sent frame");
                self.metrics.record_frame_sent(&call.func);
            }
            Err(e) => warn!(id = call.id, func = %call.func, error = %e, "Failed to encode frame"),
        }
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Bus")
            .field("state", &state.gate.state())
            .field("pending", &state.correlator.pending_count())
            .field("queued", &state.gate.queued_len())
            .field("handlers", &state.dispatcher.len())
            .field("frame_context", &state.frame_context)
            .finish()
    }
}
