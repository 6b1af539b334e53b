//! Notification bridge.
//!
//! The engine invokes host handlers by name over `bifrost/notification`.
//! The method name is the registration key and the argument is passed
//! through untouched. The reply is `true` when a handler ran and `false`
//! when the key is unknown, which is not an error.

use crate::channel::MethodCallHandler;
use bifrost_event::{MethodCall, Reply};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Host handler for one notification key.
///
/// Closures taking `&Value` are handlers.
pub trait NotificationHandler: Send + Sync {
    fn on_notification(&self, arguments: &Value);
}

impl<F> NotificationHandler for F
where
    F: Fn(&Value) + Send + Sync,
{
    fn on_notification(&self, arguments: &Value) {
        self(arguments);
    }
}

/// Keyed registry of notification handlers.
///
/// Last registration wins. A dispatch runs against the handler registered
/// when it started; registering or unregistering the same key meanwhile
/// affects only later dispatches.
///
/// # Example
///
/// ```
/// use bifrost_runtime::NotificationBridge;
/// use serde_json::{json, Value};
///
/// let bridge = NotificationBridge::new();
/// bridge.register("login", |args: &Value| println!("login: {args}"));
///
/// assert!(bridge.dispatch("login", &json!({"user": "ada"})));
/// assert!(!bridge.dispatch("logout", &Value::Null));
/// ```
#[derive(Default)]
pub struct NotificationBridge {
    handlers: RwLock<HashMap<String, Arc<dyn NotificationHandler>>>,
}

impl NotificationBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `key`.
    ///
    /// Returns `true` if a previous handler was replaced.
    pub fn register<H>(&self, key: impl Into<String>, handler: H) -> bool
    where
        H: NotificationHandler + 'static,
    {
        self.register_arc(key, Arc::new(handler))
    }

    /// Registers an already shared handler under `key`.
    pub fn register_arc(&self, key: impl Into<String>, handler: Arc<dyn NotificationHandler>) -> bool {
        let key = key.into();
        let replaced = self.handlers.write().insert(key.clone(), handler).is_some();
        debug!(key = %key, replaced, "notification handler registered");
        replaced
    }

    /// Removes the handler for `key`, returning whether one was present.
    pub fn unregister(&self, key: &str) -> bool {
        let removed = self.handlers.write().remove(key).is_some();
        if removed {
            debug!(key = %key, "notification handler unregistered");
        }
        removed
    }

    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.handlers.read().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    /// Runs the handler for `key` with `arguments`.
    ///
    /// Returns `false` without side effects when nothing is registered.
    pub fn dispatch(&self, key: &str, arguments: &Value) -> bool {
        // Clone out so the handler runs without the lock held.
        let handler = self.handlers.read().get(key).cloned();
        match handler {
            Some(handler) => {
                handler.on_notification(arguments);
                true
            }
            None => {
                debug!(key = %key, "notification without handler");
                false
            }
        }
    }
}

impl MethodCallHandler for NotificationBridge {
    fn on_method_call(&self, call: MethodCall, reply: Reply) {
        let handled = self.dispatch(&call.method, &call.arguments);
        reply.success(Value::Bool(handled));
    }
}

impl std::fmt::Debug for NotificationBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.handlers.read().keys().cloned().collect();
        keys.sort();
        f.debug_struct("NotificationBridge")
            .field("keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MethodChannel;
    use bifrost_types::ChannelName;
    use parking_lot::Mutex;
    use serde_json::json;

    fn counter() -> (Arc<Mutex<Vec<Value>>>, impl NotificationHandler) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |args: &Value| sink.lock().push(args.clone()))
    }

    #[test]
    fn registered_key_runs_handler_once() {
        let bridge = NotificationBridge::new();
        let (seen, handler) = counter();
        assert!(!bridge.register("refresh", handler));

        assert!(bridge.dispatch("refresh", &json!({"tab": 2})));
        assert_eq!(*seen.lock(), [json!({"tab": 2})]);
    }

    #[test]
    fn unregistered_key_reports_false() {
        let bridge = NotificationBridge::new();
        let (seen, handler) = counter();
        bridge.register("refresh", handler);

        assert!(!bridge.dispatch("other", &Value::Null));
        assert!(bridge.unregister("refresh"));
        assert!(!bridge.dispatch("refresh", &Value::Null));
        assert!(seen.lock().is_empty());
        assert!(!bridge.unregister("refresh"));
    }

    #[test]
    fn last_registration_wins() {
        let bridge = NotificationBridge::new();
        let (first, handler) = counter();
        bridge.register("k", handler);
        let (second, handler) = counter();
        assert!(bridge.register("k", handler));

        bridge.dispatch("k", &json!(1));
        assert!(first.lock().is_empty());
        assert_eq!(second.lock().len(), 1);
        assert_eq!(bridge.len(), 1);
    }

    #[test]
    fn handler_may_reregister_during_dispatch() {
        let bridge = Arc::new(NotificationBridge::new());
        let weak = Arc::downgrade(&bridge);
        let (seen, replacement) = counter();
        let replacement: Arc<dyn NotificationHandler> = Arc::new(replacement);

        bridge.register("swap", move |_args: &Value| {
            if let Some(bridge) = weak.upgrade() {
                bridge.register_arc("swap", Arc::clone(&replacement));
            }
        });

        assert!(bridge.dispatch("swap", &json!("first")));
        assert!(seen.lock().is_empty());
        assert!(bridge.dispatch("swap", &json!("second")));
        assert_eq!(*seen.lock(), [json!("second")]);
    }

    #[tokio::test]
    async fn replies_over_channel() {
        let (host, engine) = MethodChannel::pair(ChannelName::Notification);
        let bridge = Arc::new(NotificationBridge::new());
        bridge.register("login", |_args: &Value| {});
        host.set_handler(Some(bridge));

        let hit = engine.invoke_method("login", json!({"user": "ada"})).wait(None).await;
        let miss = engine.invoke_method("logout", Value::Null).wait(None).await;

        assert_eq!(hit, Ok(json!(true)));
        assert_eq!(miss, Ok(json!(false)));
    }
}
