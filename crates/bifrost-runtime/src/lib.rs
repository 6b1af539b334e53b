//! Bifrost runtime.
//!
//! Presents one long-lived embedded rendering engine through many native
//! page containers and keeps host and engine in agreement about which
//! pages exist, which one is visible, and who handles back navigation.
//!
//! # Modules
//!
//! - [`channel`]: named bidirectional method channels
//! - [`coordinator`]: page lifecycle protocol, host side
//! - [`notification`]: engine → host keyed notifications
//! - [`engine`]: engine lifecycle and surface ownership
//! - [`page`]: page container state machine
//! - [`config`]: layered configuration
//! - [`testing`]: fakes for exercising hosts without an engine
//!
//! # Example
//!
//! ```
//! use bifrost_runtime::page::{BackOutcome, PageOptions};
//! use bifrost_runtime::testing::{CanPopAnswer, FakeEngine, FakeRuntime, Journal, RecordingHost};
//! use bifrost_runtime::Bifrost;
//! use std::sync::Arc;
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let runtime = FakeRuntime::new();
//! let journal = Journal::new();
//! let fake = FakeEngine::attach(&runtime.messenger(), &journal);
//! fake.set_can_pop(CanPopAnswer::Yes);
//!
//! let bifrost = Bifrost::default();
//! bifrost.start(Arc::new(runtime), None).unwrap();
//!
//! let host = RecordingHost::new("main", &journal);
//! let page = bifrost.create_page(PageOptions::new("/greetings"), host).unwrap();
//! page.on_appear();
//!
//! assert_eq!(page.back_pressed().await, BackOutcome::Intercepted);
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod notification;
pub mod page;
pub mod testing;

pub use channel::{ChannelError, Delivery, MethodCallHandler, MethodChannel, Messenger};
pub use config::{BifrostConfig, ConfigError, ConfigLoader};
pub use coordinator::Coordinator;
pub use engine::{Bifrost, Claimant, Engine, EngineError, EngineRuntime, Surface};
pub use notification::{NotificationBridge, NotificationHandler};
pub use page::{
    BackOutcome, HandedOver, HostContainer, PageContainer, PageDescriptor, PageError, PageOptions,
};
