//! # Bridge Types
//!
//! Types that cross the boundary between the embedded client and its host
//! frame.
//!
//! ## Modules
//!
//! - [`envelope`]: outbound call frames, inbound wire frames, raw messages
//! - [`context`]: host payload schemas (context, frame context, deep links, tabs)
//! - [`errors`]: errors shared by the bus and the client API

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod context;
pub mod envelope;
pub mod errors;

pub use context::{
    Context, DeepLinkParameters, FrameContext, FrameContexts, HostClientType, LoadContext,
    TabInformation, TabInstance, TabInstanceParameters, TeamType, UserTeamRole,
};
pub use envelope::{InboundFrame, MessageId, OutboundCall, RawMessage, WireFrame};
pub use errors::{BridgeError, CodecError};
