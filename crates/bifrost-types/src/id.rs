//! Identifier types for Bifrost.
//!
//! Page identifiers are small integers because they cross the host/engine
//! boundary inside every coordinator message and the engine keys its page
//! state by them. Call identifiers are UUID-based and only used to correlate
//! a request with its reply in logs.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

/// Identifier of one page container.
///
/// Issued by [`PageIdGenerator`] and never reused within a process, even
/// after the page it named has been deallocated.
///
/// Serializes as a bare integer, matching the `id` field of the coordinator
/// page record.
///
/// # Example
///
/// ```
/// use bifrost_types::PageId;
///
/// let id = PageId::from_raw(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "page:7");
/// assert_eq!(serde_json::to_string(&id).unwrap(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(i64);

impl PageId {
    /// Wraps a raw identifier.
    ///
    /// Use this when restoring a page from a saved descriptor. Fresh ids
    /// come from [`PageIdGenerator::next_id`].
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page:{}", self.0)
    }
}

/// Issues process-unique, strictly increasing page identifiers.
///
/// The first id is `1`. Safe to call from any thread: the counter is a
/// single atomic, so two containers constructed concurrently always get
/// distinct ids.
///
/// # Example
///
/// ```
/// use bifrost_types::PageIdGenerator;
///
/// let ids = PageIdGenerator::new();
/// let a = ids.next_id();
/// let b = ids.next_id();
/// assert_eq!(a.get(), 1);
/// assert!(b > a);
/// ```
#[derive(Debug)]
pub struct PageIdGenerator {
    next: AtomicI64,
}

impl PageIdGenerator {
    /// Creates a generator whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
        }
    }

    /// Returns the next identifier.
    pub fn next_id(&self) -> PageId {
        PageId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) would
    /// issue, without consuming it.
    #[must_use]
    pub fn peek(&self) -> PageId {
        PageId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for PageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a single method invocation awaiting a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

#[allow(clippy::new_without_default)] // Issued by MethodCall constructors only
impl CallId {
    /// Creates a new random call id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn generator_starts_at_one() {
        let ids = PageIdGenerator::new();
        assert_eq!(ids.peek().get(), 1);
        assert_eq!(ids.next_id().get(), 1);
        assert_eq!(ids.next_id().get(), 2);
        assert_eq!(ids.peek().get(), 3);
    }

    #[test]
    fn concurrent_ids_are_distinct_and_increasing_per_caller() {
        let ids = Arc::new(PageIdGenerator::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..500).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for worker in workers {
            let issued = worker.join().unwrap();
            assert!(issued.windows(2).all(|w| w[0] < w[1]));
            for id in issued {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 8 * 500);
    }

    #[test]
    fn page_id_serializes_as_integer() {
        let id = PageId::from_raw(42);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(42));
        let back: PageId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn call_ids_are_unique() {
        assert_ne!(CallId::new(), CallId::new());
        assert!(CallId::new().to_string().starts_with("call:"));
    }
}
