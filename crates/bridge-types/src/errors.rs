//! # Error Types
//!
//! Errors shared by the bus core and the typed client API.

use thiserror::Error;

/// Errors surfaced synchronously to callers.
///
/// Everything else in the system is asynchronous and reported through the
/// callback contract of the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A readiness-requiring capability was used before `initialize`.
    #[error("The library has not yet been initialized")]
    Uninitialized,
}

/// Errors decoding an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload is not a JSON object.
    #[error("Frame is not an object")]
    NotAnObject,

    /// Payload has the right shape but a field has the wrong type.
    #[error("Malformed frame: {0}")]
    Malformed(String),

    /// Outbound call could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
