//! Channel transport errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ChannelError::Timeout`] | `CHANNEL_TIMEOUT` | Yes |
//! | [`ChannelError::BufferFull`] | `CHANNEL_BUFFER_FULL` | Yes |
//! | [`ChannelError::ReplyDropped`] | `CHANNEL_REPLY_DROPPED` | Yes |
//! | [`ChannelError::NotImplemented`] | `CHANNEL_NOT_IMPLEMENTED` | No |
//! | [`ChannelError::Remote`] | `CHANNEL_REMOTE_ERROR` | No |

use bifrost_types::ErrorCode;
use thiserror::Error;

/// Failure of a request/reply invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// No reply arrived within the deadline.
    #[error("{method}: no reply within {timeout_ms}ms")]
    Timeout { method: String, timeout_ms: u64 },

    /// No handler was attached and the pre-attachment buffer was full.
    #[error("{method}: dropped, pre-attachment buffer full (depth={depth})")]
    BufferFull { method: String, depth: usize },

    /// The remote handler released the reply without completing it.
    #[error("{method}: reply dropped by handler")]
    ReplyDropped { method: String },

    /// The remote side does not implement the method.
    #[error("{method}: not implemented")]
    NotImplemented { method: String },

    /// The remote handler replied with an error.
    #[error("{method}: remote error {code}: {}", message.as_deref().unwrap_or(""))]
    Remote {
        method: String,
        code: String,
        message: Option<String>,
    },
}

impl ErrorCode for ChannelError {
    fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "CHANNEL_TIMEOUT",
            Self::BufferFull { .. } => "CHANNEL_BUFFER_FULL",
            Self::ReplyDropped { .. } => "CHANNEL_REPLY_DROPPED",
            Self::NotImplemented { .. } => "CHANNEL_NOT_IMPLEMENTED",
            Self::Remote { .. } => "CHANNEL_REMOTE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::BufferFull { .. } | Self::ReplyDropped { .. }
        )
    }
}
