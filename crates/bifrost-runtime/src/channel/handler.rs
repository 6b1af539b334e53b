//! Method call handler trait.

use bifrost_event::{MethodCall, Reply};

/// Receives every inbound call on a channel.
///
/// A channel holds at most one handler. Handlers are invoked on the
/// context that issued the call (or the one that attached the handler, for
/// buffered calls) and must complete `reply` at most once; request/reply
/// callers treat an uncompleted, dropped `reply` as a failed call.
///
/// Closures taking `(MethodCall, Reply)` are handlers:
///
/// ```
/// use bifrost_event::{MethodCall, Reply};
/// use bifrost_runtime::channel::MethodCallHandler;
/// use serde_json::Value;
///
/// fn install(_h: impl MethodCallHandler) {}
///
/// install(|call: MethodCall, reply: Reply| {
///     if call.method == "ping" {
///         reply.success(Value::from("pong"));
///     } else {
///         reply.not_implemented();
///     }
/// });
/// ```
pub trait MethodCallHandler: Send + Sync {
    /// Handles one call.
    fn on_method_call(&self, call: MethodCall, reply: Reply);
}

impl<F> MethodCallHandler for F
where
    F: Fn(MethodCall, Reply) + Send + Sync,
{
    fn on_method_call(&self, call: MethodCall, reply: Reply) {
        self(call, reply);
    }
}
