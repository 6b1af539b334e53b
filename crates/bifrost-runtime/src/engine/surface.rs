//! Exclusive ownership of the engine's renderable surface.
//!
//! At most one page container owns the surface. Acquisition always
//! releases the previous owner first:
//!
//! ```text
//! claim(B) while A owns:   A.detach_surface ─► owner := B ─► B.attach_surface
//! ```
//!
//! The engine keeps only a weak back-reference to the owning host, so a
//! container that disappears without releasing never stays alive because
//! of the surface.

use crate::page::HostContainer;
use bifrost_types::PageId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Identity of one container competing for the surface.
///
/// Two containers may carry the same [`PageId`] (a page and its restored
/// copy); the token tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Claimant {
    page: PageId,
    token: u64,
}

impl Claimant {
    #[must_use]
    pub fn page(&self) -> PageId {
        self.page
    }
}

struct SurfaceOwner {
    claimant: Claimant,
    host: Weak<dyn HostContainer>,
}

/// The single render surface of the engine.
pub struct Surface {
    owner: Mutex<Option<SurfaceOwner>>,
    // Serializes release/claim pairs so no observer sees two owners.
    transfer: Mutex<()>,
    next_token: AtomicU64,
}

impl Surface {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owner: Mutex::new(None),
            transfer: Mutex::new(()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Issues a fresh identity for a container showing `page`.
    #[must_use]
    pub fn claimant(&self, page: PageId) -> Claimant {
        Claimant {
            page,
            token: self.next_token.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Page currently owning the surface.
    #[must_use]
    pub fn owner(&self) -> Option<PageId> {
        self.owner.lock().as_ref().map(|owner| owner.claimant.page)
    }

    #[must_use]
    pub fn is_owned_by(&self, claimant: Claimant) -> bool {
        self.owner
            .lock()
            .as_ref()
            .is_some_and(|owner| owner.claimant == claimant)
    }

    /// Hands the surface to `claimant`.
    ///
    /// Returns `false` if `claimant` already owns it, in which case nothing
    /// is detached or attached.
    pub fn claim(&self, claimant: Claimant, host: &Arc<dyn HostContainer>) -> bool {
        let _transfer = self.transfer.lock();
        let page = claimant.page;

        let previous = {
            let mut owner = self.owner.lock();
            if owner.as_ref().is_some_and(|current| current.claimant == claimant) {
                return false;
            }
            owner.take()
        };

        if let Some(previous) = previous {
            debug!(from = %previous.claimant.page, to = %page, "releasing surface for transfer");
            if let Some(previous_host) = previous.host.upgrade() {
                previous_host.detach_surface(previous.claimant.page);
            }
        }

        *self.owner.lock() = Some(SurfaceOwner {
            claimant,
            host: Arc::downgrade(host),
        });
        host.attach_surface(page);
        info!(page = %page, "surface claimed");
        true
    }

    /// Releases the surface if `claimant` owns it.
    pub fn release(&self, claimant: Claimant) -> bool {
        let _transfer = self.transfer.lock();

        let released = {
            let mut owner = self.owner.lock();
            match owner.as_ref() {
                Some(current) if current.claimant == claimant => owner.take(),
                _ => None,
            }
        };

        let Some(released) = released else {
            return false;
        };
        if let Some(host) = released.host.upgrade() {
            host.detach_surface(claimant.page);
        }
        debug!(page = %claimant.page, "surface released");
        true
    }

    /// Re-attaches the surface to its current owner unless that owner is
    /// `except`.
    ///
    /// Used when a container hides while another one still shows the
    /// engine, so the visible owner gets its rendering back.
    pub fn refresh(&self, except: Claimant) -> bool {
        let _transfer = self.transfer.lock();

        let Some((claimant, host)) = self.live_owner() else {
            return false;
        };
        if claimant == except {
            return false;
        }
        host.attach_surface(claimant.page);
        debug!(page = %claimant.page, "surface refreshed");
        true
    }

    /// Pops the navigation of the owning container.
    ///
    /// No-op returning `false` when nothing owns the surface. The host is
    /// called without holding any surface lock, so it may tear the page
    /// down synchronously.
    pub fn pop_current(&self) -> bool {
        let Some((claimant, host)) = self.live_owner() else {
            debug!("pop requested with no surface owner");
            return false;
        };
        info!(page = %claimant.page, "popping surface owner");
        host.pop_navigation(claimant.page);
        true
    }

    fn live_owner(&self) -> Option<(Claimant, Arc<dyn HostContainer>)> {
        let owner = self.owner.lock();
        let current = owner.as_ref()?;
        current.host.upgrade().map(|host| (current.claimant, host))
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("owner", &self.owner())
            .finish()
    }
}
