//! Bidirectional method channel.
//!
//! A channel is a pair of endpoints, one on the host side and one on the
//! engine side. Invoking on one side delivers to the handler installed on
//! the other:
//!
//! ```text
//!  host                                   engine
//! ┌──────────────┐   invoke(m, arg)     ┌──────────────┐
//! │ MethodChannel│ ───────────────────► │  Endpoint    │──► handler
//! │  (host side) │                      │ pending[≤N]  │
//! │  Endpoint    │ ◄─────────────────── │ MethodChannel│
//! └──────────────┘   invoke(m, arg)     └──────────────┘
//! ```
//!
//! Each endpoint owns one handler slot and one [`PendingCallQueue`]. Calls
//! that arrive while the slot is empty are buffered up to the queue depth
//! and replayed when a handler attaches.

use super::handler::MethodCallHandler;
use super::pending_queue::PendingCallQueue;
use super::ChannelError;
use bifrost_event::{MethodCall, MethodReply, Reply, ReplyReceiver};
use bifrost_types::ChannelName;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Which side of the boundary an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Host,
    Engine,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host => f.write_str("host"),
            Self::Engine => f.write_str("engine"),
        }
    }
}

/// What happened to an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the remote handler.
    Delivered,
    /// Queued until the remote side installs a handler.
    Buffered,
    /// No handler and no buffer room; the call is gone.
    Dropped,
}

struct EndpointSlot {
    handler: Option<Arc<dyn MethodCallHandler>>,
    pending: PendingCallQueue,
    // Bumped on every handler change; a replay stops when it goes stale.
    generation: u64,
    // Buffered calls are still being handed to the new handler.
    replaying: bool,
}

pub(crate) struct Endpoint {
    name: ChannelName,
    side: Side,
    slot: Mutex<EndpointSlot>,
}

impl Endpoint {
    fn new(name: ChannelName, side: Side) -> Self {
        Self {
            name,
            side,
            slot: Mutex::new(EndpointSlot {
                handler: None,
                pending: PendingCallQueue::default(),
                generation: 0,
                replaying: false,
            }),
        }
    }

    fn receive(&self, call: MethodCall, reply: Reply) -> Delivery {
        let mut slot = self.slot.lock();
        if slot.replaying {
            // Queue behind the calls still being replayed.
            slot.pending.defer(call, reply, self.name);
            return Delivery::Buffered;
        }
        let Some(handler) = slot.handler.clone() else {
            return match slot.pending.try_enqueue(call, reply, self.name) {
                Ok(()) => Delivery::Buffered,
                Err(_dropped) => Delivery::Dropped,
            };
        };
        drop(slot);

        trace!(channel = %self.name, side = %self.side, method = %call.method, call = %call.id, "dispatch");
        handler.on_method_call(call, reply);
        Delivery::Delivered
    }

    fn set_handler(&self, handler: Option<Arc<dyn MethodCallHandler>>) {
        let generation = {
            let mut slot = self.slot.lock();
            match (&slot.handler, &handler) {
                (None, None) => return,
                (Some(_), None) => debug!(channel = %self.name, side = %self.side, "handler detached"),
                (Some(_), Some(_)) => debug!(channel = %self.name, side = %self.side, "handler replaced"),
                (None, Some(_)) => debug!(channel = %self.name, side = %self.side, "handler attached"),
            }
            slot.generation += 1;
            slot.replaying = handler.is_some() && !slot.pending.is_empty();
            slot.handler = handler;
            if !slot.replaying {
                return;
            }
            slot.generation
        };
        self.replay(generation);
    }

    /// Hands buffered calls to the handler of `generation`, oldest first.
    ///
    /// Calls arriving meanwhile queue up behind the buffered ones, so the
    /// handler sees everything in arrival order.
    fn replay(&self, generation: u64) {
        loop {
            let (handler, calls) = {
                let mut slot = self.slot.lock();
                if slot.generation != generation {
                    // A newer set_handler owns the queue now.
                    return;
                }
                let Some(handler) = slot.handler.clone() else {
                    slot.replaying = false;
                    return;
                };
                if slot.pending.is_empty() {
                    slot.replaying = false;
                    return;
                }
                (handler, slot.pending.drain(self.name))
            };

            for (call, reply) in calls {
                trace!(channel = %self.name, side = %self.side, method = %call.method, call = %call.id, "replay");
                handler.on_method_call(call, reply);
            }
        }
    }

    fn has_handler(&self) -> bool {
        self.slot.lock().handler.is_some()
    }

    fn resize_buffer(&self, depth: usize) {
        self.slot.lock().pending.resize(depth, self.name);
    }

    fn buffered(&self) -> usize {
        self.slot.lock().pending.len()
    }
}

/// One side's view of a named channel.
///
/// Cloning yields another handle to the same endpoints.
///
/// # Example
///
/// ```
/// use bifrost_runtime::channel::{Delivery, MethodChannel};
/// use bifrost_event::{MethodCall, Reply};
/// use bifrost_types::ChannelName;
/// use serde_json::json;
///
/// let (host, engine) = MethodChannel::pair(ChannelName::Common);
///
/// // Nothing listens yet and no buffer is configured.
/// assert_eq!(host.invoke("hello", json!(1)), Delivery::Dropped);
///
/// engine.set_method_call_handler(|_call: MethodCall, reply: Reply| reply.success(json!("ok")));
/// assert_eq!(host.invoke("hello", json!(1)), Delivery::Delivered);
/// ```
#[derive(Clone)]
pub struct MethodChannel {
    local: Arc<Endpoint>,
    remote: Arc<Endpoint>,
}

impl MethodChannel {
    /// Creates both sides of a channel: `(host, engine)`.
    #[must_use]
    pub fn pair(name: ChannelName) -> (Self, Self) {
        let host = Arc::new(Endpoint::new(name, Side::Host));
        let engine = Arc::new(Endpoint::new(name, Side::Engine));
        (
            Self {
                local: Arc::clone(&host),
                remote: Arc::clone(&engine),
            },
            Self {
                local: engine,
                remote: host,
            },
        )
    }

    #[must_use]
    pub fn name(&self) -> ChannelName {
        self.local.name
    }

    /// Side this handle sends from.
    #[must_use]
    pub fn side(&self) -> Side {
        self.local.side
    }

    /// Installs, replaces, or (with `None`) removes this side's handler.
    ///
    /// Installing a handler replays every call buffered while none was set.
    /// Removing a handler when none is set is a no-op.
    pub fn set_handler(&self, handler: Option<Arc<dyn MethodCallHandler>>) {
        self.local.set_handler(handler);
    }

    /// Installs `handler`, replacing any previous one.
    pub fn set_method_call_handler<H>(&self, handler: H)
    where
        H: MethodCallHandler + 'static,
    {
        self.set_handler(Some(Arc::new(handler)));
    }

    /// Removes this side's handler.
    pub fn clear_handler(&self) {
        self.set_handler(None);
    }

    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.local.has_handler()
    }

    /// Returns `true` if the other side has a handler installed.
    #[must_use]
    pub fn remote_attached(&self) -> bool {
        self.remote.has_handler()
    }

    /// Sets how many outbound calls are held while the other side has no
    /// handler. `0` disables buffering.
    pub fn resize_buffer(&self, depth: usize) {
        self.remote.resize_buffer(depth);
    }

    /// Number of outbound calls waiting for the other side's handler.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.remote.buffered()
    }

    /// Fire-and-forget invocation.
    pub fn invoke(&self, method: &str, arguments: Value) -> Delivery {
        let call = MethodCall::new(method, arguments);
        self.remote.receive(call, Reply::detached())
    }

    /// Request/reply invocation.
    ///
    /// The call is dispatched immediately; the returned [`PendingReply`]
    /// resolves once the remote handler completes its [`Reply`].
    pub fn invoke_method(&self, method: &str, arguments: Value) -> PendingReply {
        let call = MethodCall::new(method, arguments);
        let (reply, rx) = Reply::channel();
        let delivery = self.remote.receive(call, reply);
        PendingReply {
            method: method.to_string(),
            delivery,
            depth: self.remote.slot.lock().pending.depth(),
            rx,
        }
    }
}

impl std::fmt::Debug for MethodChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodChannel")
            .field("name", &self.local.name)
            .field("side", &self.local.side)
            .finish()
    }
}

/// Reply continuation of a request/reply invocation.
#[derive(Debug)]
pub struct PendingReply {
    method: String,
    delivery: Delivery,
    depth: usize,
    rx: ReplyReceiver,
}

impl PendingReply {
    /// How the call was handed over.
    #[must_use]
    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Waits for the reply, optionally bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::BufferFull`] if the call was dropped on send
    /// - [`ChannelError::ReplyDropped`] if the handler released the reply
    /// - [`ChannelError::Timeout`] if `timeout` elapsed first
    /// - [`ChannelError::NotImplemented`] / [`ChannelError::Remote`] for
    ///   the corresponding replies
    pub async fn wait(self, timeout: Option<Duration>) -> Result<Value, ChannelError> {
        let Self {
            method,
            delivery,
            depth,
            rx,
        } = self;

        if delivery == Delivery::Dropped {
            return Err(ChannelError::BufferFull { method, depth });
        }

        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => {
                    return Err(ChannelError::Timeout {
                        method,
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }
            },
            None => rx.await,
        };

        match received {
            Ok(MethodReply::Success(value)) => Ok(value),
            Ok(MethodReply::Error { code, message, .. }) => Err(ChannelError::Remote {
                method,
                code,
                message,
            }),
            Ok(MethodReply::NotImplemented) => Err(ChannelError::NotImplemented { method }),
            Err(_) => Err(ChannelError::ReplyDropped { method }),
        }
    }
}
