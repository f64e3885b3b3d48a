//! Response and argument coercion.
//!
//! The bus hands every callback a loose `&[Value]`. These helpers turn that
//! into the typed shape each call promises. A payload that does not match
//! its schema degrades to the type's default rather than failing the
//! callback.

use bridge_types::{Context, FrameContexts, LoadContext, TabInformation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Deserialize the first argument, falling back to `T::default()`.
pub fn first_as<T>(args: &[Value], what: &'static str) -> T
where
    T: DeserializeOwned + Default,
{
    match args.first() {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(payload = what, error = %e, "Unexpected payload shape, using defaults");
            T::default()
        }),
    }
}

/// Serialize a value into a call argument.
pub fn to_arg<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(error = %e, "Could not serialize call argument");
        Value::Null
    })
}

/// Parse a `getContext` response, filling a missing frame context from
/// `fallback`.
pub fn parse_context(args: &[Value], fallback: Option<String>) -> Context {
    let mut context: Context = first_as(args, "context");
    if context.frame_context.is_none() {
        context.frame_context = fallback.map(FrameContexts::from);
    }
    context
}

/// Parse an `executeDeepLink` response: `(success, reason?)`.
pub fn parse_completion(args: &[Value]) -> (bool, Option<String>) {
    let success = args.first().and_then(Value::as_bool).unwrap_or(false);
    let reason = args.get(1).and_then(Value::as_str).map(str::to_string);
    (success, reason)
}

/// Parse a tab instance query response.
pub fn parse_tab_information(args: &[Value]) -> TabInformation {
    first_as(args, "tab_information")
}

/// Parse a `load` notification.
pub fn parse_load_context(args: &[Value]) -> LoadContext {
    first_as(args, "load_context")
}

/// First argument as a string, empty if absent.
pub fn first_string(args: &[Value]) -> String {
    args.first()
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// First argument as a bool, false if absent.
pub fn first_bool(args: &[Value]) -> bool {
    args.first().and_then(Value::as_bool).unwrap_or(false)
}
