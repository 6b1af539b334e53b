//! Ids of pages whose container was retired for recreation.

use bifrost_types::PageId;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;

/// Pages handed over by [`PageContainer::into_descriptor`](super::PageContainer::into_descriptor)
/// and not yet restored.
///
/// Each entry is consumed by one restore, so a descriptor revives at most
/// one container and a torn-down page is never revived.
#[derive(Debug, Default)]
pub struct HandedOver {
    ids: Mutex<HashSet<PageId>>,
}

impl HandedOver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, id: PageId) {
        self.ids.lock().insert(id);
        debug!(page = %id, "awaiting restore");
    }

    /// Removes `id`, returning whether it was waiting for a restore.
    pub(crate) fn take(&self, id: PageId) -> bool {
        self.ids.lock().remove(&id)
    }

    #[must_use]
    pub fn contains(&self, id: PageId) -> bool {
        self.ids.lock().contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_once() {
        let handed_over = HandedOver::new();
        let id = PageId::from_raw(3);
        assert!(!handed_over.take(id));

        handed_over.insert(id);
        assert!(handed_over.contains(id));
        assert!(handed_over.take(id));
        assert!(!handed_over.take(id));
        assert!(handed_over.is_empty());
    }
}
