//! Page container state machine.
//!
//! One [`PageContainer`] per native page. The platform adapter forwards its
//! view lifecycle here and the container turns it into coordinator events
//! and surface transfers:
//!
//! | Host callback | Allowed in | Effect |
//! |---------------|------------|--------|
//! | construction | - | `onCreatePage` |
//! | [`on_appear`](PageContainer::on_appear) | Created, Visible, Hidden | claim surface, `onShowPage` |
//! | [`on_disappear`](PageContainer::on_disappear) | Visible | release or refresh surface |
//! | [`back_pressed`](PageContainer::back_pressed) | Visible, Hidden | `canPop`, then `onBackPressed` or default back |
//! | [`teardown`](PageContainer::teardown) / drop | any live | release surface, `onDeallocPage` |
//!
//! Calls outside their allowed states are ignored.

use super::{
    BackOutcome, ContainerState, HandedOver, HostContainer, Page, PageDescriptor, PageOptions,
};
use crate::coordinator::Coordinator;
use crate::engine::{Claimant, Engine, Surface};
use bifrost_types::PageId;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

struct ContainerCore {
    page: Page,
    state: Mutex<ContainerState>,
    coordinator: Coordinator,
    surface: Arc<Surface>,
    claimant: Claimant,
    host: Arc<dyn HostContainer>,
    handed_over: Arc<HandedOver>,
}

impl ContainerCore {
    fn state(&self) -> ContainerState {
        *self.state.lock()
    }

    fn accepts_back(&self) -> bool {
        self.state().accepts_back()
    }
}

/// Host-side state machine of one page.
///
/// Dropping a container tears it down, so `onDeallocPage` is sent exactly
/// once even when the host never calls [`teardown`](Self::teardown).
pub struct PageContainer {
    core: Arc<ContainerCore>,
    handed_over: bool,
}

impl PageContainer {
    /// Opens a new page on `engine` and announces it with `onCreatePage`.
    pub fn create(engine: &Engine, options: PageOptions, host: Arc<dyn HostContainer>) -> Self {
        let id = engine.page_ids().next_id();
        let page = Page::new(id, options, engine.page_config().default_background);
        let container = Self::assemble(engine, page, host);

        info!(page = %id, route = %container.core.page.route(), "page created");
        container.core.coordinator.on_create_page(&container.core.page.data());
        container
    }

    /// Revives a page from a saved descriptor.
    ///
    /// The page keeps its id and the engine is not told about it again.
    /// Callers check the id was handed over; see
    /// [`Bifrost::restore_page`](crate::Bifrost::restore_page).
    pub(crate) fn restore(
        engine: &Engine,
        descriptor: PageDescriptor,
        host: Arc<dyn HostContainer>,
    ) -> Self {
        let container = Self::assemble(engine, Page::from(descriptor), host);
        info!(page = %container.id(), "page restored");
        container
    }

    fn assemble(engine: &Engine, page: Page, host: Arc<dyn HostContainer>) -> Self {
        let claimant = engine.surface().claimant(page.id());
        Self {
            core: Arc::new(ContainerCore {
                page,
                state: Mutex::new(ContainerState::Created),
                coordinator: engine.coordinator().clone(),
                surface: Arc::clone(engine.surface()),
                claimant,
                host,
                handed_over: Arc::clone(engine.handed_over()),
            }),
            handed_over: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> PageId {
        self.core.page.id()
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.core.page
    }

    #[must_use]
    pub fn state(&self) -> ContainerState {
        self.core.state()
    }

    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.state() == ContainerState::Visible
    }

    #[must_use]
    pub fn owns_surface(&self) -> bool {
        self.core.surface.is_owned_by(self.core.claimant)
    }

    /// The container became visible.
    ///
    /// Takes the surface from its current owner and sends `onShowPage`,
    /// also when already visible. Returns `false` once teardown started.
    pub fn on_appear(&self) -> bool {
        {
            let mut state = self.core.state.lock();
            if !state.is_live() {
                debug!(page = %self.id(), state = %*state, "appear ignored");
                return false;
            }
            *state = ContainerState::Visible;
        }

        self.core.surface.claim(self.core.claimant, &self.core.host);
        self.core.coordinator.on_show_page(&self.core.page.data());
        true
    }

    /// The container left the screen.
    ///
    /// Gives up the surface if held. If another container owns it, that
    /// owner is re-attached so it keeps rendering.
    pub fn on_disappear(&self) -> bool {
        {
            let mut state = self.core.state.lock();
            if *state != ContainerState::Visible {
                debug!(page = %self.id(), state = %*state, "disappear ignored");
                return false;
            }
            *state = ContainerState::Hidden;
        }

        if !self.core.surface.release(self.core.claimant) {
            self.core.surface.refresh(self.core.claimant);
        }
        true
    }

    /// Handles a back gesture.
    ///
    /// Sends `canPop` right away. The returned future resolves once the
    /// engine answered or the query failed; a failed query means default
    /// navigation. If the container detached meanwhile the answer is
    /// dropped and nothing else happens.
    pub fn back_pressed(&self) -> impl Future<Output = BackOutcome> + Send + 'static {
        let core = Arc::clone(&self.core);
        let data = core.page.data();
        let query = core
            .accepts_back()
            .then(|| core.coordinator.can_pop(&data));

        async move {
            let id = core.page.id();
            let Some(query) = query else {
                debug!(page = %id, "back press while not attached");
                return BackOutcome::Suppressed;
            };

            let intercept = query.await;
            if !core.accepts_back() {
                debug!(page = %id, "stale canPop answer discarded");
                return BackOutcome::Discarded;
            }

            if intercept {
                core.coordinator.on_back_pressed(&data);
                BackOutcome::Intercepted
            } else {
                core.host.default_back_navigation(id);
                BackOutcome::DefaultNavigation
            }
        }
    }

    /// Snapshot for recreating this container later.
    #[must_use]
    pub fn save_state(&self) -> PageDescriptor {
        self.core.page.descriptor()
    }

    /// Retires this container without deallocating its page.
    ///
    /// Use when the platform destroys the native container to recreate it
    /// (configuration change, process restore); hand the descriptor to
    /// [`Bifrost::restore_page`](crate::Bifrost::restore_page), which
    /// accepts it once. A container already torn down hands over nothing:
    /// its descriptor is returned but cannot be restored.
    #[must_use]
    pub fn into_descriptor(mut self) -> PageDescriptor {
        self.handed_over = true;
        {
            let mut state = self.core.state.lock();
            if state.is_live() {
                self.core.handed_over.insert(self.id());
            }
            *state = ContainerState::Gone;
        }
        self.core.surface.release(self.core.claimant);
        debug!(page = %self.id(), "page handed over");
        self.core.page.descriptor()
    }

    /// Tears the container down, sending `onDeallocPage`.
    ///
    /// Idempotent: returns `false` if teardown already happened.
    pub fn teardown(&self) -> bool {
        {
            let mut state = self.core.state.lock();
            if !state.is_live() {
                return false;
            }
            *state = ContainerState::Detaching;
        }

        self.core.surface.release(self.core.claimant);
        self.core.coordinator.on_dealloc_page(&self.core.page.data());
        *self.core.state.lock() = ContainerState::Gone;
        info!(page = %self.id(), "page deallocated");
        true
    }
}

impl Drop for PageContainer {
    fn drop(&mut self) {
        if !self.handed_over {
            self.teardown();
        }
    }
}

impl std::fmt::Debug for PageContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContainer")
            .field("page", &self.core.page)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEngine, FakeRuntime, Journal, RecordingHost};
    use crate::Bifrost;

    fn started() -> (Bifrost, FakeEngine, Journal) {
        let runtime = FakeRuntime::new();
        let journal = Journal::new();
        let fake = FakeEngine::attach(&runtime.messenger(), &journal);
        let bifrost = Bifrost::default();
        assert_eq!(bifrost.start(Arc::new(runtime), None), Ok(true));
        (bifrost, fake, journal)
    }

    #[test]
    fn appear_is_ignored_after_teardown() {
        let (bifrost, fake, journal) = started();
        let host = RecordingHost::new("a", &journal);
        let page = bifrost.create_page(PageOptions::new("/a"), host).unwrap();

        assert!(page.teardown());
        assert!(!page.teardown());
        assert!(!page.on_appear());
        assert_eq!(fake.methods(), ["onCreatePage", "onDeallocPage"]);
        assert_eq!(page.state(), ContainerState::Gone);
    }

    #[test]
    fn disappear_only_from_visible() {
        let (bifrost, _fake, journal) = started();
        let host = RecordingHost::new("a", &journal);
        let page = bifrost.create_page(PageOptions::new("/a"), host).unwrap();

        assert!(!page.on_disappear());
        page.on_appear();
        assert!(page.owns_surface());
        assert!(page.on_disappear());
        assert!(!page.owns_surface());
        assert_eq!(page.state(), ContainerState::Hidden);
    }

    #[tokio::test]
    async fn back_press_before_showing_is_suppressed() {
        let (bifrost, fake, journal) = started();
        let host = RecordingHost::new("a", &journal);
        let page = bifrost.create_page(PageOptions::new("/a"), host).unwrap();

        assert_eq!(page.back_pressed().await, BackOutcome::Suppressed);
        assert_eq!(fake.methods(), ["onCreatePage"]);
    }

    #[test]
    fn handing_over_skips_dealloc() {
        let (bifrost, fake, journal) = started();
        let host = RecordingHost::new("a", &journal);
        let page = bifrost.create_page(PageOptions::new("/a"), host).unwrap();
        page.on_appear();

        let descriptor = page.into_descriptor();
        assert_eq!(descriptor.id, PageId::from_raw(1));
        assert_eq!(fake.methods(), ["onCreatePage", "onShowPage"]);
        assert_eq!(bifrost.engine().unwrap().surface().owner(), None);
        assert!(bifrost.engine().unwrap().handed_over().contains(descriptor.id));
    }

    #[test]
    fn torn_down_page_hands_over_nothing() {
        let (bifrost, fake, journal) = started();
        let host = RecordingHost::new("a", &journal);
        let page = bifrost.create_page(PageOptions::new("/a"), host).unwrap();
        page.teardown();

        let descriptor = page.into_descriptor();
        assert!(!bifrost.engine().unwrap().handed_over().contains(descriptor.id));
        assert_eq!(fake.methods(), ["onCreatePage", "onDeallocPage"]);
    }
}
