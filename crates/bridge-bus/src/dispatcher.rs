//! # Event Dispatcher
//!
//! Routes host-initiated calls to registered handlers and decides when the
//! built-in default action runs.
//!
//! ## Policies
//!
//! | Policy        | Handler signature                      | Default runs when                  |
//! |---------------|----------------------------------------|------------------------------------|
//! | Notification  | `Fn(&[Value])`                         | never                              |
//! | Suppressible  | `Fn(&[Value]) -> bool`                 | no handler, or every handler false |
//! | Two-phase     | `Fn(&[Value], Completion) -> bool`     | no handler, or every handler false |
//!
//! A two-phase handler that returns true takes over the acknowledgment and
//! sends it later through its [`Completion`].

use crate::events;
use crate::funcs;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Handler for a pure notification.
pub type NotificationHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Handler that may suppress the default action by returning true.
pub type SuppressibleHandler = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// Handler that may defer the acknowledgment by returning true.
pub type TwoPhaseHandler = Arc<dyn Fn(&[Value], Completion) -> bool + Send + Sync>;

/// A registered handler.
#[derive(Clone)]
pub enum EventHandler {
    /// Return value ignored.
    Notification(NotificationHandler),
    /// True means handled.
    Suppressible(SuppressibleHandler),
    /// True means the handler will complete later.
    TwoPhase(TwoPhaseHandler),
}

impl EventHandler {
    /// Wrap a notification closure.
    pub fn notification(f: impl Fn(&[Value]) + Send + Sync + 'static) -> Self {
        Self::Notification(Arc::new(f))
    }

    /// Wrap a suppressible closure.
    pub fn suppressible(f: impl Fn(&[Value]) -> bool + Send + Sync + 'static) -> Self {
        Self::Suppressible(Arc::new(f))
    }

    /// Wrap a two-phase closure.
    pub fn two_phase(f: impl Fn(&[Value], Completion) -> bool + Send + Sync + 'static) -> Self {
        Self::TwoPhase(Arc::new(f))
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Notification(_) => "notification",
            Self::Suppressible(_) => "suppressible",
            Self::TwoPhase(_) => "two_phase",
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler::{}", self.kind())
    }
}

/// Dispatch policy attached to an event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPolicy {
    /// Handlers are informed; nothing else happens.
    Notification,
    /// A default action runs unless a handler reports it handled the event.
    Suppressible {
        /// Function sent to the host when not suppressed.
        default_action: Option<&'static str>,
    },
    /// Handlers may defer the acknowledgment.
    TwoPhase {
        /// Function sent to the host to acknowledge.
        acknowledgment: &'static str,
    },
}

impl EventPolicy {
    /// Policy registered for `event`. Unknown events are notifications.
    #[must_use]
    pub fn for_event(event: &str) -> Self {
        match event {
            events::BACK_BUTTON_PRESS => Self::Suppressible {
                default_action: Some(funcs::NAVIGATE_BACK),
            },
            events::FOCUS_ENTER => Self::Suppressible {
                default_action: None,
            },
            events::BEFORE_UNLOAD => Self::TwoPhase {
                acknowledgment: funcs::READY_TO_UNLOAD,
            },
            _ => Self::Notification,
        }
    }

    fn default_action(&self) -> Option<&'static str> {
        match self {
            Self::Notification => None,
            Self::Suppressible { default_action } => *default_action,
            Self::TwoPhase { acknowledgment } => Some(acknowledgment),
        }
    }
}

/// Result of dispatching one host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handlers ran and no default applies.
    Handled,
    /// A handler suppressed the default action.
    Suppressed,
    /// The caller must send this function to the host.
    DefaultAction(&'static str),
    /// A two-phase handler took over the acknowledgment.
    Deferred,
    /// A two-phase handler acknowledged before returning.
    Acknowledged,
    /// No handler and no default: the call was ignored.
    Ignored,
}

type CompletionAction = Box<dyn FnOnce() + Send>;

/// Single-use acknowledgment handed to two-phase handlers.
///
/// Clones share one slot; the action runs at most once no matter how many
/// clones call [`Completion::complete`].
#[derive(Clone)]
pub struct Completion {
    slot: Arc<Mutex<Option<CompletionAction>>>,
}

impl Completion {
    /// Wrap the acknowledgment action.
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(Box::new(action)))),
        }
    }

    /// Run the acknowledgment. Returns false if it already ran or was
    /// cancelled.
    pub fn complete(&self) -> bool {
        let action = self.slot.lock().take();
        match action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }

    /// True once the action has run or been cancelled.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.slot.lock().is_none()
    }

    /// Cancel the action. Returns true if it had not run yet.
    fn disarm(&self) -> bool {
        self.slot.lock().take().is_some()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// Handler table keyed by event name.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Vec<EventHandler>>,
}

impl EventDispatcher {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` as the only handler for `event`, replacing any
    /// previous one.
    pub fn register(&mut self, event: impl Into<String>, handler: EventHandler) {
        let event = event.into();
        debug!(event = %event, kind = handler.kind(), "Registering handler");
        self.handlers.insert(event, vec![handler]);
    }

    /// Add `handler` alongside any existing handlers for `event`.
    pub fn add_listener(&mut self, event: impl Into<String>, handler: EventHandler) {
        self.handlers.entry(event.into()).or_default().push(handler);
    }

    /// Remove every handler for `event`.
    pub fn unregister(&mut self, event: &str) -> bool {
        self.handlers.remove(event).is_some()
    }

    /// Snapshot of the handlers for `event`, cloned so they can run without
    /// holding the table.
    #[must_use]
    pub fn handlers(&self, event: &str) -> Vec<EventHandler> {
        self.handlers.get(event).cloned().unwrap_or_default()
    }

    /// True if `event` has at least one handler.
    #[must_use]
    pub fn has_handler(&self, event: &str) -> bool {
        self.handlers.get(event).is_some_and(|h| !h.is_empty())
    }

    /// Number of events with handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

/// Run `handlers` for one host call under `policy`.
///
/// `completion` is only consulted for two-phase events with handlers. When
/// every two-phase handler declines, the completion is disarmed and the
/// acknowledgment is returned as a [`DispatchOutcome::DefaultAction`]
/// instead, unless a handler already completed it during the call
/// ([`DispatchOutcome::Acknowledged`]). Either way it is sent exactly once.
pub fn invoke(
    policy: EventPolicy,
    handlers: &[EventHandler],
    args: &[Value],
    completion: impl FnOnce() -> Completion,
) -> DispatchOutcome {
    if handlers.is_empty() {
        return match policy.default_action() {
            Some(func) => DispatchOutcome::DefaultAction(func),
            None => DispatchOutcome::Ignored,
        };
    }

    let completion = match policy {
        EventPolicy::TwoPhase { .. } => Some(completion()),
        _ => None,
    };

    let mut claimed = false;
    for handler in handlers {
        claimed |= match handler {
            EventHandler::Notification(f) => {
                f(args);
                false
            }
            EventHandler::Suppressible(f) => f(args),
            EventHandler::TwoPhase(f) => match &completion {
                Some(completion) => f(args, completion.clone()),
                // Two-phase handler on a single-phase event: hand it an
                // inert completion.
                None => f(args, Completion::new(|| {})),
            },
        };
    }

    match policy {
        EventPolicy::Notification => DispatchOutcome::Handled,
        EventPolicy::Suppressible { default_action } => match (claimed, default_action) {
            (true, _) => DispatchOutcome::Suppressed,
            (false, Some(func)) => DispatchOutcome::DefaultAction(func),
            (false, None) => DispatchOutcome::Handled,
        },
        EventPolicy::TwoPhase { acknowledgment } => {
            if claimed {
                DispatchOutcome::Deferred
            } else if completion.as_ref().map_or(true, Completion::disarm) {
                DispatchOutcome::DefaultAction(acknowledgment)
            } else {
                DispatchOutcome::Acknowledged
            }
        }
    }
}
