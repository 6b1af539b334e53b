//! Unified error interface for Bifrost.
//!
//! Every error type in the Bifrost crates implements [`ErrorCode`] so the
//! host can branch on a stable, machine-readable code instead of matching
//! on display strings.
//!
//! # Example
//!
//! ```
//! use bifrost_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum BridgeError {
//!     Missing(String),
//!     Timeout,
//! }
//!
//! impl ErrorCode for BridgeError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Missing(_) => "BRIDGE_MISSING",
//!             Self::Timeout => "BRIDGE_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! let err = BridgeError::Timeout;
//! assert_eq!(err.code(), "BRIDGE_TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error code and recoverability.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"CHANNEL_TIMEOUT"`
/// - **Layer-prefixed**: `CHANNEL_`, `ENGINE_`, `PAGE_`, `CONFIG_`
/// - **Stable**: codes are part of the host-facing contract
///
/// # Recoverability
///
/// An error is recoverable when retrying, or waiting, may succeed
/// (a reply that timed out, a buffer that was full). Invalid state and
/// a runtime that refuses to start are not recoverable.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the Bifrost conventions.
///
/// # Panics
///
/// Panics with a descriptive message if the code is empty, lacks the
/// expected prefix, or is not UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use bifrost_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// enum MyError { Timeout }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Timeout, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every variant of an error enum at once.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestError {
        Transient,
        Permanent,
    }

    impl ErrorCode for TestError {
        fn code(&self) -> &'static str {
            match self {
                Self::Transient => "TEST_TRANSIENT",
                Self::Permanent => "TEST_PERMANENT",
            }
        }

        fn is_recoverable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    #[test]
    fn error_code_trait() {
        assert_eq!(TestError::Transient.code(), "TEST_TRANSIENT");
        assert!(TestError::Transient.is_recoverable());
        assert!(!TestError::Permanent.is_recoverable());
    }

    #[test]
    fn assert_error_codes_all_variants() {
        assert_error_codes(&[TestError::Transient, TestError::Permanent], "TEST_");
    }

    #[test]
    #[should_panic(expected = "must start with prefix")]
    fn assert_error_code_wrong_prefix() {
        assert_error_code(&TestError::Transient, "WRONG_");
    }

    #[test]
    fn upper_snake_case_rules() {
        assert!(is_upper_snake_case("CHANNEL_TIMEOUT"));
        assert!(is_upper_snake_case("E2"));
        assert!(!is_upper_snake_case(""));
        assert!(!is_upper_snake_case("channel"));
        assert!(!is_upper_snake_case("_A"));
        assert!(!is_upper_snake_case("A_"));
        assert!(!is_upper_snake_case("A__B"));
    }
}
