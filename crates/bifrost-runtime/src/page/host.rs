//! Host container adapter.

use bifrost_types::PageId;

/// Platform side of a page container.
///
/// The page state machine is platform-neutral; everything that touches the
/// native view hierarchy goes through this trait. Implementations are held
/// strongly by their [`PageContainer`](super::PageContainer) and weakly by
/// the engine surface while they own it.
///
/// [`attach_surface`](Self::attach_surface) and
/// [`detach_surface`](Self::detach_surface) run while a surface transfer is
/// in progress and must not call back into the surface or a page container.
pub trait HostContainer: Send + Sync {
    /// The engine surface now renders into this container.
    fn attach_surface(&self, _page: PageId) {}

    /// The engine surface was taken away from this container.
    fn detach_surface(&self, _page: PageId) {}

    /// Performs the platform's own back action (pop or dismiss).
    fn default_back_navigation(&self, page: PageId);

    /// Pops this container on request of the engine.
    ///
    /// Defaults to [`default_back_navigation`](Self::default_back_navigation).
    /// Adapters presented modally override this to dismiss instead.
    fn pop_navigation(&self, page: PageId) {
        self.default_back_navigation(page);
    }
}
