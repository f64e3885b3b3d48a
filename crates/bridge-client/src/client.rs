//! # Bridge Client
//!
//! Typed calls layered over [`Bus`]. Every method here builds a function
//! name and argument list, hands it to the bus with a response parser, and
//! returns immediately; responses arrive through the supplied callback.
//!
//! All methods fail with [`BridgeError::Uninitialized`] when called before
//! `initialize`.

use crate::responses;
use bridge_bus::{Bus, ResponseCallback, Submission};
use bridge_types::{
    BridgeError, Context, DeepLinkParameters, FrameContext, TabInformation, TabInstanceParameters,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

pub use bridge_bus::funcs;

/// Callback run once the handshake completes.
pub type InitializeCallback = Box<dyn FnOnce() + Send>;

/// Callback receiving `(success, reason)`.
pub type CompletionCallback = Box<dyn FnOnce(bool, Option<String>) + Send>;

/// Fallback receiving `(success, reason)` for calls made without a callback.
pub type GenericCompletionHandler = Arc<dyn Fn(bool, Option<String>) + Send + Sync>;

fn log_failures() -> GenericCompletionHandler {
    Arc::new(|success, reason| {
        if !success {
            error!(reason = reason.as_deref().unwrap_or("unknown"), "Host call failed");
        }
    })
}

/// Typed API over a shared [`Bus`].
#[derive(Clone)]
pub struct BridgeClient {
    pub(crate) bus: Bus,
    generic_completion: Arc<RwLock<GenericCompletionHandler>>,
}

impl BridgeClient {
    /// Wrap `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            bus,
            generic_completion: Arc::new(RwLock::new(log_failures())),
        }
    }

    /// The underlying bus.
    #[must_use]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Replace the handler used when a completion-style call has no
    /// callback. The default logs failures.
    pub fn set_generic_completion_handler(
        &self,
        handler: impl Fn(bool, Option<String>) + Send + Sync + 'static,
    ) {
        *self.generic_completion.write() = Arc::new(handler);
    }

    fn generic_completion(&self) -> GenericCompletionHandler {
        self.generic_completion.read().clone()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Start the handshake. `callback` runs once the host answers, or
    /// immediately if it already has.
    pub fn initialize(&self, callback: Option<InitializeCallback>) {
        let callback = callback.map(|callback| -> ResponseCallback {
            Box::new(move |_: &[Value]| callback())
        });
        self.bus.initialize(None, callback);
    }

    /// Start the handshake and announce the frame's URLs.
    ///
    /// `setFrameContext` is queued behind the handshake, so it is the
    /// second frame the host sees.
    pub fn initialize_with_frame_context(
        &self,
        frame_context: &FrameContext,
        callback: Option<InitializeCallback>,
    ) -> Result<Submission, BridgeError> {
        self.initialize(callback);
        self.set_frame_context(frame_context)
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// Retrieve contextual metadata.
    ///
    /// When the response carries no frame context, the one established by
    /// the handshake is filled in.
    pub fn get_context(
        &self,
        callback: impl FnOnce(Context) + Send + 'static,
    ) -> Result<Submission, BridgeError> {
        let bus = self.bus.downgrade();
        self.bus.send_with_callback(
            funcs::GET_CONTEXT,
            Vec::new(),
            Some(Box::new(move |args: &[Value]| {
                let fallback = bus.upgrade().and_then(|bus| bus.frame_context());
                callback(responses::parse_context(args, fallback));
            })),
        )
    }

    /// Ask the host to open a deep link.
    ///
    /// Without `on_complete` the generic completion handler receives the
    /// outcome.
    pub fn execute_deep_link(
        &self,
        link: &str,
        on_complete: Option<CompletionCallback>,
    ) -> Result<Submission, BridgeError> {
        let generic = self.generic_completion();
        self.bus.send_with_callback(
            funcs::EXECUTE_DEEP_LINK,
            vec![Value::from(link)],
            Some(Box::new(move |args: &[Value]| {
                let (success, reason) = responses::parse_completion(args);
                match on_complete {
                    Some(on_complete) => on_complete(success, reason),
                    None => generic(success, reason),
                }
            })),
        )
    }

    /// Share a deep link to a sub-entity. No response.
    pub fn share_deep_link(&self, params: &DeepLinkParameters) -> Result<Submission, BridgeError> {
        self.bus.send_message(
            funcs::SHARE_DEEP_LINK,
            vec![
                Value::from(params.sub_entity_id.as_str()),
                Value::from(params.sub_entity_label.as_str()),
                params
                    .sub_entity_web_url
                    .as_deref()
                    .map_or(Value::Null, Value::from),
            ],
        )
    }

    /// Tell the host which URLs the frame serves. No response.
    pub fn set_frame_context(&self, frame_context: &FrameContext) -> Result<Submission, BridgeError> {
        self.bus.send_message(
            funcs::SET_FRAME_CONTEXT,
            vec![responses::to_arg(frame_context)],
        )
    }

    /// List tab instances the user has access to.
    pub fn get_tab_instances(
        &self,
        callback: impl FnOnce(TabInformation) + Send + 'static,
        params: Option<&TabInstanceParameters>,
    ) -> Result<Submission, BridgeError> {
        self.tab_query(funcs::GET_TAB_INSTANCES, callback, params)
    }

    /// List the most recently used tab instances.
    pub fn get_mru_tab_instances(
        &self,
        callback: impl FnOnce(TabInformation) + Send + 'static,
        params: Option<&TabInstanceParameters>,
    ) -> Result<Submission, BridgeError> {
        self.tab_query(funcs::GET_MRU_TAB_INSTANCES, callback, params)
    }

    fn tab_query(
        &self,
        func: &str,
        callback: impl FnOnce(TabInformation) + Send + 'static,
        params: Option<&TabInstanceParameters>,
    ) -> Result<Submission, BridgeError> {
        let params = params.map_or(Value::Null, responses::to_arg);
        self.bus.send_with_callback(
            func,
            vec![params],
            Some(Box::new(move |args: &[Value]| {
                callback(responses::parse_tab_information(args));
            })),
        )
    }

    // =========================================================================
    // Print
    // =========================================================================

    /// Install the Ctrl+P / Cmd+P shortcut. Idempotent.
    pub fn enable_print_capability(&self) -> Result<(), BridgeError> {
        self.bus.enable_print_capability()
    }

    /// Invoke the platform print action.
    pub fn print(&self) {
        debug!("Print requested by application");
        self.bus.print();
    }
}

impl fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeClient").field("bus", &self.bus).finish()
    }
}
