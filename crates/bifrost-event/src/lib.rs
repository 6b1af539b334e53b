//! Message types for Bifrost channels.
//!
//! Every exchange between the host and the engine is a named method call
//! with an opaque argument, optionally answered by a single reply:
//!
//! | Type | Role |
//! |------|------|
//! | [`MethodCall`] | method name + opaque argument |
//! | [`Reply`] | single-use continuation handed to the receiving handler |
//! | [`MethodReply`] | success value, error, or not-implemented |
//! | [`CoordinatorMethod`] | method names of the page lifecycle protocol |
//! | [`PageData`] | `{id, route, arguments}` record sent with lifecycle events |

mod call;
mod coordinator;
mod error;
mod reply;

pub use call::MethodCall;
pub use coordinator::{CoordinatorMethod, Direction, PageData};
pub use error::EventError;
pub use reply::{MethodReply, Reply, ReplyReceiver};
