//! Reply values and single-use reply continuations.
//!
//! A request/reply invocation hands the remote handler a [`Reply`]. The
//! handler completes it exactly once by calling one of
//! [`success`](Reply::success), [`error`](Reply::error) or
//! [`not_implemented`](Reply::not_implemented); each consumes the `Reply`,
//! so a second completion does not type-check.
//!
//! ```text
//! caller                              handler
//!   │ invoke_method("canPop", page)     │
//!   │ ────────── MethodCall + Reply ──► │
//!   │                                   │ reply.success(true)
//!   │ ◄──────── MethodReply ─────────── │
//! ```
//!
//! Dropping an uncompleted `Reply` closes the continuation; the caller
//! observes that as a dropped reply rather than waiting forever.

use serde_json::Value;
use tokio::sync::oneshot;

/// Outcome of a request/reply invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodReply {
    /// The handler produced a value.
    Success(Value),
    /// The handler reported a failure.
    Error {
        code: String,
        message: Option<String>,
        details: Value,
    },
    /// No handler understood the method.
    NotImplemented,
}

impl MethodReply {
    /// Returns `true` for [`MethodReply::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the success value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Success(value) => value.as_bool(),
            _ => None,
        }
    }
}

/// Receiving half of a reply continuation.
pub type ReplyReceiver = oneshot::Receiver<MethodReply>;

/// Single-use continuation handed to a method call handler.
///
/// Fire-and-forget invocations get a detached `Reply`; completing it is
/// a no-op so handlers need not care which kind of call they serve.
#[derive(Debug)]
pub struct Reply {
    tx: Option<oneshot::Sender<MethodReply>>,
}

impl Reply {
    /// Creates a connected continuation and its receiver.
    #[must_use]
    pub fn channel() -> (Self, ReplyReceiver) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Creates a continuation nobody listens to.
    #[must_use]
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Returns `true` if no caller is waiting for this reply.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.tx.as_ref().map_or(true, |tx| tx.is_closed())
    }

    /// Completes with a value.
    pub fn success(self, value: Value) {
        self.send(MethodReply::Success(value));
    }

    /// Completes with an error.
    pub fn error(self, code: impl Into<String>, message: Option<String>, details: Value) {
        self.send(MethodReply::Error {
            code: code.into(),
            message,
            details,
        });
    }

    /// Completes with "method not implemented".
    pub fn not_implemented(self) {
        self.send(MethodReply::NotImplemented);
    }

    /// Completes with an already-built reply.
    pub fn send(mut self, reply: MethodReply) {
        if let Some(tx) = self.tx.take() {
            // Receiver may have given up (timeout); nothing to report.
            let _ = tx.send(reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_reaches_receiver() {
        let (reply, mut rx) = Reply::channel();
        assert!(!reply.is_detached());
        reply.success(json!(true));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.as_bool(), Some(true));
        assert!(got.is_success());
    }

    #[test]
    fn error_carries_code_and_message() {
        let (reply, mut rx) = Reply::channel();
        reply.error("E_BUSY", Some("busy".into()), Value::Null);
        match rx.try_recv().unwrap() {
            MethodReply::Error { code, message, .. } => {
                assert_eq!(code, "E_BUSY");
                assert_eq!(message.as_deref(), Some("busy"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn dropped_reply_closes_receiver() {
        let (reply, mut rx) = Reply::channel();
        drop(reply);
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }

    #[test]
    fn detached_reply_is_noop() {
        let reply = Reply::detached();
        assert!(reply.is_detached());
        reply.not_implemented();
    }

    #[test]
    fn reply_detached_once_receiver_dropped() {
        let (reply, rx) = Reply::channel();
        drop(rx);
        assert!(reply.is_detached());
        reply.success(Value::Null);
    }

    #[test]
    fn non_bool_success_has_no_bool() {
        assert_eq!(MethodReply::Success(json!("yes")).as_bool(), None);
        assert_eq!(MethodReply::NotImplemented.as_bool(), None);
    }
}
