//! Channel transport.
//!
//! Named, bidirectional, asynchronous method invocation between the host
//! and the engine:
//!
//! - [`MethodChannel`]: one side of a named channel; `invoke` (fire-and-forget),
//!   `invoke_method` (request/single reply), `set_handler`
//! - [`Messenger`]: the three Bifrost channels, shared by host and runtime
//! - [`MethodCallHandler`]: receives inbound calls
//! - [`PendingCallQueue`]: bounded pre-attachment buffer
//!
//! # Delivery
//!
//! | Remote handler | Buffer room | Result |
//! |----------------|-------------|--------|
//! | installed | - | [`Delivery::Delivered`] |
//! | installed, replay running | - | [`Delivery::Buffered`], after the replayed calls |
//! | absent | yes | [`Delivery::Buffered`], replayed on attach |
//! | absent | no | [`Delivery::Dropped`] |

mod error;
mod handler;
mod messenger;
mod method_channel;
mod pending_queue;

pub use error::ChannelError;
pub use handler::MethodCallHandler;
pub use messenger::Messenger;
pub use method_channel::{Delivery, MethodChannel, PendingReply, Side};
pub use pending_queue::PendingCallQueue;
