//! Test doubles for hosts and engines.
//!
//! Lets host code be exercised without a real rendering engine:
//!
//! - [`FakeRuntime`]: an [`EngineRuntime`] whose entry point does nothing
//!   (or fails on demand)
//! - [`FakeEngine`]: the engine side of the coordinator channel; records
//!   every lifecycle call and answers `canPop` as configured
//! - [`RecordingHost`]: a [`HostContainer`] that records surface and
//!   navigation callbacks
//! - [`Journal`]: shared, ordered log both of them write to
//!
//! # Example
//!
//! ```
//! use bifrost_runtime::page::PageOptions;
//! use bifrost_runtime::testing::{FakeEngine, FakeRuntime, Journal, RecordingHost};
//! use bifrost_runtime::Bifrost;
//! use std::sync::Arc;
//!
//! let runtime = FakeRuntime::new();
//! let journal = Journal::new();
//! let fake = FakeEngine::attach(&runtime.messenger(), &journal);
//!
//! let bifrost = Bifrost::default();
//! bifrost.start(Arc::new(runtime), None).unwrap();
//!
//! let page = bifrost
//!     .create_page(PageOptions::new("/greetings"), RecordingHost::new("a", &journal))
//!     .unwrap();
//! page.on_appear();
//! drop(page);
//!
//! assert_eq!(fake.methods(), ["onCreatePage", "onShowPage", "onDeallocPage"]);
//! assert_eq!(
//!     journal.entries(),
//!     [
//!         "engine:onCreatePage:1",
//!         "host:a:attach:1",
//!         "engine:onShowPage:1",
//!         "host:a:detach:1",
//!         "engine:onDeallocPage:1",
//!     ]
//! );
//! ```

use crate::channel::{Messenger, MethodChannel, PendingReply};
use crate::engine::EngineRuntime;
use crate::page::HostContainer;
use bifrost_event::{CoordinatorMethod, MethodCall, PageData, Reply};
use bifrost_types::{ChannelName, PageId};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Ordered record of host and engine events.
///
/// Entries read `engine:<method>:<page>` and `host:<name>:<event>:<page>`.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Index of the first entry equal to `entry`.
    #[must_use]
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries.lock().iter().position(|e| e == entry)
    }

    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.position(entry).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Engine runtime that runs nothing.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    messenger: Messenger,
    failure: Option<String>,
    runs: Mutex<Vec<String>>,
}

impl FakeRuntime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime whose entry point always fails with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn messenger(&self) -> Messenger {
        self.messenger.clone()
    }

    /// Entry points run so far, in order.
    #[must_use]
    pub fn runs(&self) -> Vec<String> {
        self.runs.lock().clone()
    }
}

impl EngineRuntime for FakeRuntime {
    fn messenger(&self) -> Messenger {
        self.messenger.clone()
    }

    fn run_entrypoint(&self, entrypoint: &str) -> Result<(), String> {
        if let Some(reason) = &self.failure {
            return Err(reason.clone());
        }
        self.runs.lock().push(entrypoint.to_string());
        Ok(())
    }
}

/// How an [`FakeEngine`] answers `canPop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanPopAnswer {
    Yes,
    No,
    /// Replies with an error.
    Error,
    NotImplemented,
    /// Replies with a string instead of a boolean.
    NonBoolean,
    /// Drops the reply unanswered.
    Drop,
    /// Keeps the reply until [`FakeEngine::release_held`].
    Hold,
}

struct FakeEngineState {
    journal: Journal,
    calls: Mutex<Vec<(String, Value)>>,
    answer: Mutex<CanPopAnswer>,
    held: Mutex<Vec<Reply>>,
}

impl FakeEngineState {
    fn on_call(&self, call: MethodCall, reply: Reply) {
        let page = PageData::from_value(call.arguments.clone())
            .map(|data| data.id.get().to_string())
            .unwrap_or_else(|_| "-".into());
        self.journal.record(format!("engine:{}:{}", call.method, page));
        self.calls.lock().push((call.method.clone(), call.arguments));

        let wants_answer = call
            .method
            .parse::<CoordinatorMethod>()
            .is_ok_and(CoordinatorMethod::expects_reply);
        if !wants_answer {
            return;
        }
        let answer = *self.answer.lock();
        match answer {
            CanPopAnswer::Yes => reply.success(Value::Bool(true)),
            CanPopAnswer::No => reply.success(Value::Bool(false)),
            CanPopAnswer::Error => reply.error("FAKE_ENGINE", Some("canPop failed".into()), Value::Null),
            CanPopAnswer::NotImplemented => reply.not_implemented(),
            CanPopAnswer::NonBoolean => reply.success(Value::from("maybe")),
            CanPopAnswer::Drop => drop(reply),
            CanPopAnswer::Hold => self.held.lock().push(reply),
        }
    }
}

/// Engine-side end of the Bifrost channels.
///
/// Answers `canPop` with [`CanPopAnswer::No`] until told otherwise.
#[derive(Clone)]
pub struct FakeEngine {
    coordinator: MethodChannel,
    notification: MethodChannel,
    common: MethodChannel,
    state: Arc<FakeEngineState>,
}

impl FakeEngine {
    /// Creates a fake that does not listen yet.
    #[must_use]
    pub fn new(messenger: &Messenger, journal: &Journal) -> Self {
        Self {
            coordinator: messenger.engine(ChannelName::Coordinator),
            notification: messenger.engine(ChannelName::Notification),
            common: messenger.engine(ChannelName::Common),
            state: Arc::new(FakeEngineState {
                journal: journal.clone(),
                calls: Mutex::new(Vec::new()),
                answer: Mutex::new(CanPopAnswer::No),
                held: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a fake already listening on the coordinator channel.
    #[must_use]
    pub fn attach(messenger: &Messenger, journal: &Journal) -> Self {
        let fake = Self::new(messenger, journal);
        fake.listen();
        fake
    }

    /// Installs the coordinator handler; buffered calls arrive now.
    pub fn listen(&self) {
        let state = Arc::clone(&self.state);
        self.coordinator
            .set_method_call_handler(move |call: MethodCall, reply: Reply| state.on_call(call, reply));
    }

    pub fn set_can_pop(&self, answer: CanPopAnswer) {
        *self.state.answer.lock() = answer;
    }

    /// Answers every held `canPop` with `intercept`. Returns how many.
    pub fn release_held(&self, intercept: bool) -> usize {
        let held: Vec<Reply> = std::mem::take(&mut *self.state.held.lock());
        let count = held.len();
        for reply in held {
            reply.success(Value::Bool(intercept));
        }
        count
    }

    #[must_use]
    pub fn held(&self) -> usize {
        self.state.held.lock().len()
    }

    /// Method names received, in order.
    #[must_use]
    pub fn methods(&self) -> Vec<String> {
        self.state.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    /// How often `method` was received.
    #[must_use]
    pub fn count(&self, method: CoordinatorMethod) -> usize {
        self.state
            .calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method.as_str())
            .count()
    }

    /// Page records received with `method`, in order.
    #[must_use]
    pub fn pages(&self, method: CoordinatorMethod) -> Vec<PageData> {
        self.state
            .calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method.as_str())
            .filter_map(|(_, args)| PageData::from_value(args.clone()).ok())
            .collect()
    }

    /// Sends `popViewController` to the host.
    pub fn pop_view_controller(&self) -> PendingReply {
        self.coordinator
            .invoke_method(CoordinatorMethod::PopViewController.as_str(), Value::Null)
    }

    /// Sends a notification named `key` to the host.
    pub fn notify(&self, key: &str, arguments: Value) -> PendingReply {
        self.notification.invoke_method(key, arguments)
    }

    /// Calls `method` on the host's common channel.
    pub fn call_common(&self, method: &str, arguments: Value) -> PendingReply {
        self.common.invoke_method(method, arguments)
    }
}

impl std::fmt::Debug for FakeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeEngine")
            .field("methods", &self.methods())
            .field("held", &self.held())
            .finish()
    }
}

/// Host container that writes its callbacks to a [`Journal`].
#[derive(Debug)]
pub struct RecordingHost {
    name: String,
    journal: Journal,
}

impl RecordingHost {
    #[must_use]
    pub fn new(name: impl Into<String>, journal: &Journal) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            journal: journal.clone(),
        })
    }

    fn record(&self, event: &str, page: PageId) {
        self.journal
            .record(format!("host:{}:{}:{}", self.name, event, page.get()));
    }

    /// This host's entries, in order.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        let prefix = format!("host:{}:", self.name);
        self.journal
            .entries()
            .into_iter()
            .filter(|e| e.starts_with(&prefix))
            .collect()
    }
}

impl HostContainer for RecordingHost {
    fn attach_surface(&self, page: PageId) {
        self.record("attach", page);
    }

    fn detach_surface(&self, page: PageId) {
        self.record("detach", page);
    }

    fn default_back_navigation(&self, page: PageId) {
        self.record("back", page);
    }

    fn pop_navigation(&self, page: PageId) {
        self.record("pop", page);
    }
}
