//! Engine lifecycle manager.

use super::{Engine, EngineError, EngineRuntime};
use crate::channel::MethodCallHandler;
use crate::config::BifrostConfig;
use crate::notification::{NotificationBridge, NotificationHandler};
use crate::page::{HostContainer, PageContainer, PageDescriptor, PageError, PageOptions};
use bifrost_types::PageIdGenerator;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the single engine of the process.
///
/// Construct one and share it; [`start`](Self::start) runs the engine at
/// most once. Notification handlers may be registered before the engine
/// starts.
///
/// # Example
///
/// ```
/// use bifrost_runtime::testing::FakeRuntime;
/// use bifrost_runtime::Bifrost;
/// use std::sync::Arc;
///
/// let bifrost = Bifrost::default();
/// assert_eq!(bifrost.start(Arc::new(FakeRuntime::new()), None), Ok(true));
/// assert_eq!(bifrost.start(Arc::new(FakeRuntime::new()), None), Ok(false));
/// ```
pub struct Bifrost {
    config: BifrostConfig,
    page_ids: Arc<PageIdGenerator>,
    notifications: Arc<NotificationBridge>,
    engine: Mutex<Option<Arc<Engine>>>,
}

impl Bifrost {
    #[must_use]
    pub fn new(config: BifrostConfig) -> Self {
        Self {
            config,
            page_ids: Arc::new(PageIdGenerator::new()),
            notifications: Arc::new(NotificationBridge::new()),
            engine: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BifrostConfig {
        &self.config
    }

    /// Starts the engine.
    ///
    /// Returns `Ok(true)` on the first successful start and `Ok(false)`,
    /// with no side effects, once an engine is running. `common_handler`
    /// serves `bifrost/common` when given.
    ///
    /// # Errors
    ///
    /// [`EngineError::StartFailed`] if the entry point cannot run. No
    /// engine is kept in that case.
    pub fn start(
        &self,
        runtime: Arc<dyn EngineRuntime>,
        common_handler: Option<Arc<dyn MethodCallHandler>>,
    ) -> Result<bool, EngineError> {
        let mut slot = self.engine.lock();
        if let Some(engine) = slot.as_ref() {
            warn!(cache_key = %engine.cache_key(), "engine already started");
            return Ok(false);
        }

        let engine = Engine::launch(
            runtime,
            &self.config,
            Arc::clone(&self.page_ids),
            Arc::clone(&self.notifications),
            common_handler,
        )?;
        info!(
            cache_key = %engine.cache_key(),
            entrypoint = %engine.entrypoint(),
            "engine started"
        );
        *slot = Some(Arc::new(engine));
        Ok(true)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.engine.lock().is_some()
    }

    /// The running engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] before a successful start.
    pub fn engine(&self) -> Result<Arc<Engine>, EngineError> {
        self.engine.lock().clone().ok_or(EngineError::NotRunning)
    }

    /// Opens a page container on the running engine.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotRunning`] before a successful start.
    pub fn create_page(
        &self,
        options: PageOptions,
        host: Arc<dyn HostContainer>,
    ) -> Result<PageContainer, EngineError> {
        let engine = self.engine()?;
        Ok(PageContainer::create(&engine, options, host))
    }

    /// Recreates a container from a saved descriptor.
    ///
    /// # Errors
    ///
    /// - [`PageError::Engine`] before a successful start
    /// - [`PageError::IdNotIssued`] if the descriptor's id was never issued
    ///   in this process
    /// - [`PageError::NotHandedOver`] if no container handed the id over
    ///   with [`PageContainer::into_descriptor`], or it was already restored
    pub fn restore_page(
        &self,
        descriptor: PageDescriptor,
        host: Arc<dyn HostContainer>,
    ) -> Result<PageContainer, PageError> {
        let engine = self.engine()?;
        if descriptor.id.get() < 1 || descriptor.id >= self.page_ids.peek() {
            return Err(PageError::IdNotIssued(descriptor.id));
        }
        if !engine.handed_over().take(descriptor.id) {
            return Err(PageError::NotHandedOver(descriptor.id));
        }
        Ok(PageContainer::restore(&engine, descriptor, host))
    }

    /// Registers a handler for engine notifications named `key`.
    ///
    /// Returns `true` if a previous handler was replaced.
    pub fn register_notification<H>(&self, key: impl Into<String>, handler: H) -> bool
    where
        H: NotificationHandler + 'static,
    {
        self.notifications.register(key, handler)
    }

    pub fn unregister_notification(&self, key: &str) -> bool {
        self.notifications.unregister(key)
    }

    #[must_use]
    pub fn notifications(&self) -> &Arc<NotificationBridge> {
        &self.notifications
    }
}

impl Default for Bifrost {
    fn default() -> Self {
        Self::new(BifrostConfig::default())
    }
}

impl std::fmt::Debug for Bifrost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bifrost")
            .field("running", &self.is_running())
            .field("next_page_id", &self.page_ids.peek())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRuntime;
    use bifrost_types::ErrorCode;

    #[test]
    fn engine_before_start_is_not_running() {
        let bifrost = Bifrost::default();
        assert!(!bifrost.is_running());
        assert_eq!(bifrost.engine().unwrap_err(), EngineError::NotRunning);
    }

    #[test]
    fn second_start_has_no_side_effects() {
        let bifrost = Bifrost::default();
        let first = Arc::new(FakeRuntime::new());
        let second = Arc::new(FakeRuntime::new());

        assert_eq!(bifrost.start(first.clone(), None), Ok(true));
        assert_eq!(bifrost.start(second.clone(), None), Ok(false));

        assert_eq!(first.runs(), ["main"]);
        assert!(second.runs().is_empty());
    }

    #[test]
    fn failed_entrypoint_is_fatal() {
        let bifrost = Bifrost::default();
        let err = bifrost
            .start(Arc::new(FakeRuntime::failing("no such entrypoint")), None)
            .unwrap_err();

        assert_eq!(err.code(), "ENGINE_START_FAILED");
        assert!(!err.is_recoverable());
        assert!(!bifrost.is_running());
    }

    #[test]
    fn configured_entrypoint_and_cache_key() {
        let mut config = BifrostConfig::default();
        config.engine.entrypoint = "embedMain".into();
        let bifrost = Bifrost::new(config);
        let runtime = Arc::new(FakeRuntime::new());

        bifrost.start(runtime.clone(), None).unwrap();
        let engine = bifrost.engine().unwrap();

        assert_eq!(runtime.runs(), ["embedMain"]);
        assert_eq!(engine.cache_key(), "io.flutter.bifrost");
    }

    #[test]
    fn plugin_detach_clears_inbound_handler() {
        let bifrost = Bifrost::default();
        bifrost.start(Arc::new(FakeRuntime::new()), None).unwrap();
        let engine = bifrost.engine().unwrap();
        let coordinator = engine.coordinator().channel();

        assert!(engine.is_plugin_attached());
        assert!(coordinator.has_handler());

        assert!(engine.on_plugin_detached());
        assert!(!engine.on_plugin_detached());
        assert!(!coordinator.has_handler());

        assert!(engine.on_plugin_attached());
        assert!(coordinator.has_handler());
    }
}
