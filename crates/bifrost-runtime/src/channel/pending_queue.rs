//! Pre-attachment buffer for channel endpoints.
//!
//! Calls that reach an endpoint before its handler is installed wait here,
//! up to the configured depth, and are replayed in arrival order once a
//! handler attaches.

use bifrost_event::{MethodCall, Reply};
use bifrost_types::ChannelName;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Bounded FIFO of calls waiting for a handler.
///
/// A depth of `0` (the default) disables buffering: every call that finds
/// no handler is dropped.
#[derive(Debug, Default)]
pub struct PendingCallQueue {
    queue: VecDeque<(MethodCall, Reply)>,
    depth: usize,
}

impl PendingCallQueue {
    /// Creates a queue holding at most `depth` calls.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(depth),
            depth,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Changes the depth.
    ///
    /// Shrinking below the current length drops the most recent calls so the
    /// oldest, which raced the handler first, still get delivered.
    pub fn resize(&mut self, depth: usize, channel: ChannelName) {
        self.depth = depth;
        while self.queue.len() > depth {
            if let Some((call, _reply)) = self.queue.pop_back() {
                warn!(
                    "{}: buffer resized to {}, dropping pending {} ({})",
                    channel, depth, call.method, call.id
                );
            }
        }
    }

    /// Attempts to enqueue a call.
    ///
    /// On overflow the call is handed back so the caller can decide how the
    /// drop is reported; its reply is released when the tuple is dropped.
    pub fn try_enqueue(
        &mut self,
        call: MethodCall,
        reply: Reply,
        channel: ChannelName,
    ) -> Result<(), (MethodCall, Reply)> {
        if self.queue.len() >= self.depth {
            warn!(
                "{}: no handler and buffer full (depth={}), dropping {} ({})",
                channel, self.depth, call.method, call.id
            );
            return Err((call, reply));
        }

        debug!(
            "{}: no handler yet, buffering {} ({}, pending={})",
            channel,
            call.method,
            call.id,
            self.queue.len() + 1
        );
        self.queue.push_back((call, reply));
        Ok(())
    }

    /// Queues a call behind the ones being replayed, ignoring the depth.
    ///
    /// Only used while a freshly attached handler is draining the queue;
    /// the handler is present, so nothing here is dropped.
    pub fn defer(&mut self, call: MethodCall, reply: Reply, channel: ChannelName) {
        debug!(
            "{}: replay in progress, deferring {} ({})",
            channel, call.method, call.id
        );
        self.queue.push_back((call, reply));
    }

    /// Takes every buffered call, oldest first.
    pub fn drain(&mut self, channel: ChannelName) -> Vec<(MethodCall, Reply)> {
        let count = self.queue.len();
        if count > 0 {
            info!("{}: handler attached, replaying {} buffered calls", channel, count);
        }
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CH: ChannelName = ChannelName::Coordinator;

    fn call(method: &str) -> MethodCall {
        MethodCall::bare(method)
    }

    #[test]
    fn default_queue_buffers_nothing() {
        let mut queue = PendingCallQueue::default();
        assert_eq!(queue.depth(), 0);
        assert!(queue.try_enqueue(call("a"), Reply::detached(), CH).is_err());
        assert!(queue.is_empty());
    }

    #[test]
    fn enqueue_respects_depth() {
        let mut queue = PendingCallQueue::with_depth(2);
        assert!(queue.try_enqueue(call("a"), Reply::detached(), CH).is_ok());
        assert!(queue.try_enqueue(call("b"), Reply::detached(), CH).is_ok());

        let (rejected, _) = queue
            .try_enqueue(call("c"), Reply::detached(), CH)
            .unwrap_err();
        assert_eq!(rejected.method, "c");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn drain_preserves_order() {
        let mut queue = PendingCallQueue::with_depth(3);
        for m in ["first", "second", "third"] {
            queue.try_enqueue(call(m), Reply::detached(), CH).unwrap();
        }

        let methods: Vec<_> = queue.drain(CH).into_iter().map(|(c, _)| c.method).collect();
        assert_eq!(methods, vec!["first", "second", "third"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn shrinking_drops_newest() {
        let mut queue = PendingCallQueue::with_depth(3);
        for m in ["a", "b", "c"] {
            queue.try_enqueue(call(m), Reply::detached(), CH).unwrap();
        }

        queue.resize(1, CH);

        let methods: Vec<_> = queue.drain(CH).into_iter().map(|(c, _)| c.method).collect();
        assert_eq!(methods, vec!["a"]);
    }

    #[test]
    fn deferred_calls_bypass_depth() {
        let mut queue = PendingCallQueue::with_depth(1);
        queue.try_enqueue(call("a"), Reply::detached(), CH).unwrap();
        queue.defer(call("b"), Reply::detached(), CH);

        let methods: Vec<_> = queue.drain(CH).into_iter().map(|(c, _)| c.method).collect();
        assert_eq!(methods, vec!["a", "b"]);
    }

    #[test]
    fn buffered_calls_keep_their_id() {
        let mut queue = PendingCallQueue::with_depth(2);
        let first = call("a");
        let id = first.id;
        queue.try_enqueue(first, Reply::detached(), CH).unwrap();

        let drained = queue.drain(CH);
        assert_eq!(drained[0].0.id, id);
        assert_eq!(drained[0].0.to_string(), format!("a({id})"));
    }

    #[test]
    fn overflowing_request_releases_its_reply() {
        let mut queue = PendingCallQueue::with_depth(0);
        let (reply, mut rx) = Reply::channel();
        let rejected = queue.try_enqueue(call("canPop"), reply, CH);
        drop(rejected);
        assert!(rx.try_recv().is_err());
    }
}
