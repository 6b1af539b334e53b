//! Coordinator protocol, host side.
//!
//! Sends page lifecycle events to the engine, asks it whether it intercepts
//! back navigation (`canPop`), and serves the engine's `popViewController`
//! command.
//!
//! `canPop` fails open: an error reply, a not-implemented reply, a
//! non-boolean value, a dropped reply or a timeout all answer `false`, and
//! the host falls back to its default back action.

use crate::channel::{Delivery, MethodCallHandler, MethodChannel};
use crate::config::CoordinatorConfig;
use crate::engine::Surface;
use bifrost_event::{CoordinatorMethod, Direction, MethodCall, PageData, Reply};
use bifrost_types::ErrorCode;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

/// Host end of the `bifrost/coordinator` channel.
#[derive(Debug, Clone)]
pub struct Coordinator {
    channel: MethodChannel,
    can_pop_timeout: Duration,
}

impl Coordinator {
    /// Wraps the host side of the coordinator channel.
    ///
    /// Sizes the pre-attachment buffer from `config`.
    #[must_use]
    pub fn new(channel: MethodChannel, config: &CoordinatorConfig) -> Self {
        channel.resize_buffer(config.buffer_depth);
        Self {
            channel,
            can_pop_timeout: config.can_pop_timeout(),
        }
    }

    #[must_use]
    pub fn channel(&self) -> &MethodChannel {
        &self.channel
    }

    pub fn on_create_page(&self, page: &PageData) -> Delivery {
        self.notify(CoordinatorMethod::OnCreatePage, page)
    }

    pub fn on_show_page(&self, page: &PageData) -> Delivery {
        self.notify(CoordinatorMethod::OnShowPage, page)
    }

    pub fn on_dealloc_page(&self, page: &PageData) -> Delivery {
        self.notify(CoordinatorMethod::OnDeallocPage, page)
    }

    pub fn on_back_pressed(&self, page: &PageData) -> Delivery {
        self.notify(CoordinatorMethod::OnBackPressed, page)
    }

    /// Asks the engine whether it handles the back gesture for `page`.
    ///
    /// The request is sent before this returns; the future only waits for
    /// the answer and never fails.
    pub fn can_pop(&self, page: &PageData) -> impl Future<Output = bool> + Send + 'static {
        let pending = self
            .channel
            .invoke_method(CoordinatorMethod::CanPop.as_str(), page.to_value());
        let timeout = self.can_pop_timeout;
        let id = page.id;

        async move {
            match pending.wait(Some(timeout)).await {
                Ok(Value::Bool(intercept)) => {
                    debug!(page = %id, intercept, "canPop answered");
                    intercept
                }
                Ok(other) => {
                    warn!(page = %id, reply = %other, "canPop returned a non-boolean, using default navigation");
                    false
                }
                Err(e) => {
                    warn!(page = %id, code = e.code(), error = %e, "canPop failed, using default navigation");
                    false
                }
            }
        }
    }

    /// Serves engine → host calls, resolving the surface owner through
    /// `surface`.
    pub fn install_inbound(&self, surface: &Arc<Surface>) {
        self.channel.set_method_call_handler(InboundHandler {
            surface: Arc::downgrade(surface),
        });
    }

    /// Stops serving engine → host calls.
    pub fn clear_inbound(&self) {
        self.channel.clear_handler();
    }

    fn notify(&self, method: CoordinatorMethod, page: &PageData) -> Delivery {
        debug_assert!(method.direction() == Direction::HostToEngine && !method.expects_reply());
        let delivery = self.channel.invoke(method.as_str(), page.to_value());
        match delivery {
            Delivery::Dropped => {
                warn!(method = %method, page = %page.id, "coordinator event dropped, engine not listening");
            }
            Delivery::Buffered => {
                debug!(method = %method, page = %page.id, "coordinator event buffered");
            }
            Delivery::Delivered => {
                debug!(method = %method, page = %page.id, "coordinator event sent");
            }
        }
        delivery
    }
}

struct InboundHandler {
    surface: Weak<Surface>,
}

impl MethodCallHandler for InboundHandler {
    fn on_method_call(&self, call: MethodCall, reply: Reply) {
        match call.method.parse::<CoordinatorMethod>() {
            Ok(CoordinatorMethod::PopViewController) => {
                if let Some(surface) = self.surface.upgrade() {
                    surface.pop_current();
                }
                reply.success(Value::Null);
            }
            Ok(method) => {
                debug_assert_eq!(method.direction(), Direction::HostToEngine);
                debug!(call = %call.id, method = %method, "host-bound method sent to host");
                reply.not_implemented();
            }
            Err(_) => {
                debug!(call = %call.id, method = %call.method, "unknown inbound coordinator call");
                reply.not_implemented();
            }
        }
    }
}
