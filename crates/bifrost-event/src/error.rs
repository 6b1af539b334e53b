//! Event layer errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`EventError::UnknownMethod`] | `EVENT_UNKNOWN_METHOD` | No |
//! | [`EventError::InvalidPageData`] | `EVENT_INVALID_PAGE_DATA` | No |

use bifrost_types::ErrorCode;
use thiserror::Error;

/// Failure to interpret a method call.
#[derive(Debug, Error)]
pub enum EventError {
    /// Method name is not part of the coordinator protocol.
    #[error("unknown coordinator method: {0}")]
    UnknownMethod(String),

    /// Page record argument could not be decoded.
    #[error("invalid page data: {0}")]
    InvalidPageData(#[from] serde_json::Error),
}

impl ErrorCode for EventError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownMethod(_) => "EVENT_UNKNOWN_METHOD",
            Self::InvalidPageData(_) => "EVENT_INVALID_PAGE_DATA",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
