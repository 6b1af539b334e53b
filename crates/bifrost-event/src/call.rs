//! Inbound and outbound method calls.

use bifrost_types::CallId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named method invocation carried by a channel.
///
/// The argument is opaque to the transport: it is delivered to the remote
/// handler exactly as it was passed to `invoke`.
///
/// # Example
///
/// ```
/// use bifrost_event::MethodCall;
/// use serde_json::json;
///
/// let call = MethodCall::new("openProfile", json!({"user": 3}));
/// assert_eq!(call.method, "openProfile");
/// assert_eq!(call.arguments["user"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Correlation id for logging.
    pub id: CallId,
    /// Method name.
    pub method: String,
    /// Opaque argument; `Value::Null` when absent.
    pub arguments: Value,
}

impl MethodCall {
    /// Creates a call with a fresh [`CallId`].
    #[must_use]
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: CallId::new(),
            method: method.into(),
            arguments,
        }
    }

    /// Creates a call without an argument.
    #[must_use]
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }
}

impl std::fmt::Display for MethodCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.method, self.id)
    }
}
