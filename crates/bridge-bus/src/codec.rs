//! # Frame Codec
//!
//! Converts between typed frames and the JSON values that cross the window
//! boundary.
//!
//! Inbound payloads may be JSON objects or strings holding a JSON object;
//! native hosts post the latter.

use bridge_types::{CodecError, InboundFrame, MessageId, OutboundCall, WireFrame};
use serde_json::Value;

/// Encode an outbound call as a JSON value.
pub fn encode(call: &OutboundCall) -> Result<Value, CodecError> {
    serde_json::to_value(call).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Encode an outbound call as a JSON string.
pub fn encode_string(call: &OutboundCall) -> Result<String, CodecError> {
    serde_json::to_string(call).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decode an inbound payload into a wire frame.
pub fn decode(data: &Value) -> Result<WireFrame, CodecError> {
    match data {
        Value::Object(_) => serde_json::from_value(data.clone())
            .map_err(|e| CodecError::Malformed(e.to_string())),
        Value::String(text) => {
            let parsed: Value =
                serde_json::from_str(text).map_err(|e| CodecError::Malformed(e.to_string()))?;
            match parsed {
                Value::Object(_) => serde_json::from_value(parsed)
                    .map_err(|e| CodecError::Malformed(e.to_string())),
                _ => Err(CodecError::NotAnObject),
            }
        }
        _ => Err(CodecError::NotAnObject),
    }
}

/// Classify a decoded frame.
///
/// A frame whose id is pending is a response; otherwise a frame with a
/// function name is a host call. Anything else matches nothing and yields
/// `None`.
pub fn classify(frame: WireFrame, is_pending: impl Fn(MessageId) -> bool) -> Option<InboundFrame> {
    let WireFrame { id, func, args } = frame;
    match (id, func) {
        (Some(id), _) if is_pending(id) => Some(InboundFrame::Response { id, args }),
        (_, Some(func)) => Some(InboundFrame::HostCall { func, args }),
        _ => None,
    }
}
