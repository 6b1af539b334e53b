//! Core types for Bifrost.
//!
//! Foundational types shared by every Bifrost crate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  bifrost-types   : PageId, ChannelName, Color, ErrorCode ◄─  │
//! │  bifrost-event   : MethodCall, MethodReply, PageData         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  bifrost-runtime : channels, coordinator, engine, pages      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  bifrost-cli     : host simulator                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use bifrost_types::{ChannelName, PageIdGenerator};
//!
//! let ids = PageIdGenerator::new();
//! let first = ids.next_id();
//! assert_eq!(first.get(), 1);
//! assert_eq!(ChannelName::Coordinator.as_str(), "bifrost/coordinator");
//! ```

mod channel;
mod color;
mod error;
mod id;

pub use channel::ChannelName;
pub use color::Color;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{CallId, PageId, PageIdGenerator};
