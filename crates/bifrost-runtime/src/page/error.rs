//! Page container errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`PageError::IdNotIssued`] | `PAGE_ID_NOT_ISSUED` | No |
//! | [`PageError::NotHandedOver`] | `PAGE_NOT_HANDED_OVER` | No |
//! | [`PageError::Engine`] | `PAGE_ENGINE_UNAVAILABLE` | inner |

use crate::engine::EngineError;
use bifrost_types::{ErrorCode, PageId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// A descriptor names an id this process never issued.
    #[error("cannot restore {0}: id was never issued")]
    IdNotIssued(PageId),

    /// The page is still live, was torn down, or was already restored.
    #[error("cannot restore {0}: page was not handed over")]
    NotHandedOver(PageId),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ErrorCode for PageError {
    fn code(&self) -> &'static str {
        match self {
            Self::IdNotIssued(_) => "PAGE_ID_NOT_ISSUED",
            Self::NotHandedOver(_) => "PAGE_NOT_HANDED_OVER",
            Self::Engine(_) => "PAGE_ENGINE_UNAVAILABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::IdNotIssued(_) | Self::NotHandedOver(_) => false,
            Self::Engine(inner) => inner.is_recoverable(),
        }
    }
}
