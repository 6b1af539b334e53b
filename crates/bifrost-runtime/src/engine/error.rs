//! Engine lifecycle errors.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`EngineError::NotRunning`] | `ENGINE_NOT_RUNNING` | Yes |
//! | [`EngineError::StartFailed`] | `ENGINE_START_FAILED` | No |
//!
//! A second start is not an error: it is logged and reported as
//! `Ok(false)` by [`Bifrost::start`](super::Bifrost::start).

use bifrost_types::ErrorCode;
use thiserror::Error;

/// Engine lifecycle error.
///
/// # Example
///
/// ```
/// use bifrost_runtime::EngineError;
/// use bifrost_types::ErrorCode;
///
/// let err = EngineError::NotRunning;
/// assert_eq!(err.code(), "ENGINE_NOT_RUNNING");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine has not been started yet.
    #[error("engine not running")]
    NotRunning,

    /// The entry point could not be run. Startup is over; it is never
    /// retried.
    #[error("failed to run entrypoint '{entrypoint}': {reason}")]
    StartFailed { entrypoint: String, reason: String },
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotRunning => "ENGINE_NOT_RUNNING",
            Self::StartFailed { .. } => "ENGINE_START_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Starting the engine later fixes NotRunning.
        matches!(self, Self::NotRunning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifrost_types::assert_error_codes;

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(
            &[
                EngineError::NotRunning,
                EngineError::StartFailed {
                    entrypoint: "main".into(),
                    reason: "missing".into(),
                },
            ],
            "ENGINE_",
        );
    }

    #[test]
    fn start_failure_is_fatal() {
        let err = EngineError::StartFailed {
            entrypoint: "main".into(),
            reason: "no such symbol".into(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "failed to run entrypoint 'main': no such symbol"
        );
    }
}
