//! The running engine and its host-side channels.

use super::{EngineError, EngineRuntime, Surface};
use crate::channel::{MethodCallHandler, MethodChannel, Messenger};
use crate::config::{BifrostConfig, PageConfig};
use crate::coordinator::Coordinator;
use crate::notification::NotificationBridge;
use crate::page::HandedOver;
use bifrost_types::{ChannelName, PageIdGenerator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// A started engine.
///
/// Created once by [`Bifrost::start`](super::Bifrost::start) and shared by
/// every page container afterwards.
pub struct Engine {
    cache_key: String,
    entrypoint: String,
    runtime: Arc<dyn EngineRuntime>,
    messenger: Messenger,
    coordinator: Coordinator,
    common: MethodChannel,
    notifications: Arc<NotificationBridge>,
    surface: Arc<Surface>,
    handed_over: Arc<HandedOver>,
    page_ids: Arc<PageIdGenerator>,
    page_config: PageConfig,
    plugin_attached: AtomicBool,
}

impl Engine {
    /// Runs the entry point, then opens the host side of every channel.
    pub(crate) fn launch(
        runtime: Arc<dyn EngineRuntime>,
        config: &BifrostConfig,
        page_ids: Arc<PageIdGenerator>,
        notifications: Arc<NotificationBridge>,
        common_handler: Option<Arc<dyn MethodCallHandler>>,
    ) -> Result<Self, EngineError> {
        let entrypoint = config.engine.entrypoint.clone();
        runtime
            .run_entrypoint(&entrypoint)
            .map_err(|reason| EngineError::StartFailed {
                entrypoint: entrypoint.clone(),
                reason,
            })?;
        debug!(entrypoint = %entrypoint, "entrypoint running");

        let messenger = runtime.messenger();
        let coordinator = Coordinator::new(
            messenger.host(ChannelName::Coordinator),
            &config.coordinator,
        );
        messenger
            .host(ChannelName::Notification)
            .set_handler(Some(Arc::clone(&notifications) as Arc<dyn MethodCallHandler>));

        let common = messenger.host(ChannelName::Common);
        if let Some(handler) = common_handler {
            common.set_handler(Some(handler));
        }

        let engine = Self {
            cache_key: config.engine.cache_key.clone(),
            entrypoint,
            runtime,
            messenger,
            coordinator,
            common,
            notifications,
            surface: Arc::new(Surface::new()),
            handed_over: Arc::new(HandedOver::new()),
            page_ids,
            page_config: config.page.clone(),
            plugin_attached: AtomicBool::new(false),
        };
        engine.on_plugin_attached();
        Ok(engine)
    }

    /// Key this engine is cached under.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    #[must_use]
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    #[must_use]
    pub fn runtime(&self) -> &Arc<dyn EngineRuntime> {
        &self.runtime
    }

    #[must_use]
    pub fn messenger(&self) -> &Messenger {
        &self.messenger
    }

    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Host side of `bifrost/common`.
    #[must_use]
    pub fn common_channel(&self) -> &MethodChannel {
        &self.common
    }

    #[must_use]
    pub fn notifications(&self) -> &Arc<NotificationBridge> {
        &self.notifications
    }

    #[must_use]
    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    /// Pages waiting to be restored from a descriptor.
    #[must_use]
    pub fn handed_over(&self) -> &Arc<HandedOver> {
        &self.handed_over
    }

    #[must_use]
    pub fn page_ids(&self) -> &Arc<PageIdGenerator> {
        &self.page_ids
    }

    #[must_use]
    pub fn page_config(&self) -> &PageConfig {
        &self.page_config
    }

    /// The Bifrost plugin is registered with the engine: serve inbound
    /// coordinator calls.
    ///
    /// Returns `false` if it already was.
    pub fn on_plugin_attached(&self) -> bool {
        if self.plugin_attached.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.coordinator.install_inbound(&self.surface);
        info!(cache_key = %self.cache_key, "plugin attached");
        true
    }

    /// The plugin was removed from the engine: stop serving inbound
    /// coordinator calls.
    ///
    /// Returns `false` if it was not attached.
    pub fn on_plugin_detached(&self) -> bool {
        if !self.plugin_attached.swap(false, Ordering::AcqRel) {
            return false;
        }
        self.coordinator.clear_inbound();
        info!(cache_key = %self.cache_key, "plugin detached");
        true
    }

    #[must_use]
    pub fn is_plugin_attached(&self) -> bool {
        self.plugin_attached.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cache_key", &self.cache_key)
            .field("entrypoint", &self.entrypoint)
            .field("surface", &self.surface)
            .field("plugin_attached", &self.is_plugin_attached())
            .finish_non_exhaustive()
    }
}
