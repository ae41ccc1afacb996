//! Unified error interface for doorman crates.
//!
//! Every public error type in the workspace implements [`ErrorCode`] so that
//! faults crossing a crate boundary (or landing in a log line) stay
//! machine-readable. The gate records the code of whatever fault produced a
//! `Faulted` state, and a retry affordance can branch on
//! [`ErrorCode::is_recoverable`] without parsing messages.
//!
//! # Example
//!
//! ```
//! use doorman_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum ProbeError {
//!     Timeout,
//!     BadPayload,
//! }
//!
//! impl ErrorCode for ProbeError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Timeout => "PROBE_TIMEOUT",
//!             Self::BadPayload => "PROBE_BAD_PAYLOAD",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(ProbeError::Timeout.code(), "PROBE_TIMEOUT");
//! assert!(ProbeError::Timeout.is_recoverable());
//! ```

/// Machine-readable error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"SOURCE_MINT_FAILED"`
/// - **Crate-prefixed**: `SOURCE_*`, `PROBE_*`, `GATE_*`
/// - **Stable**: codes are an API contract and do not change once defined
///
/// # Recoverability
///
/// An error is recoverable when retrying may succeed or the user can take a
/// corrective action (re-authenticate, fix connectivity). It is not
/// recoverable when a retry cannot change the outcome (invalid
/// configuration, closed provider).
pub trait ErrorCode {
    /// Returns the machine-readable code for this error.
    fn code(&self) -> &'static str;

    /// Returns whether retrying or user action can clear this error.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows workspace conventions.
///
/// Checks that the code is non-empty, UPPER_SNAKE_CASE, and carries the
/// expected crate prefix.
///
/// # Panics
///
/// Panics with a descriptive message if any check fails.
///
/// # Example
///
/// ```
/// use doorman_types::{assert_error_code, ErrorCode};
///
/// #[derive(Debug)]
/// struct Closed;
///
/// impl ErrorCode for Closed {
///     fn code(&self) -> &'static str { "SOURCE_CLOSED" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Closed, "SOURCE_");
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
///
/// # Example
///
/// ```
/// use doorman_types::{assert_error_codes, ErrorCode};
///
/// #[derive(Debug)]
/// enum GateError { Stopped, Lagged }
///
/// impl ErrorCode for GateError {
///     fn code(&self) -> &'static str {
///         match self {
///             Self::Stopped => "GATE_STOPPED",
///             Self::Lagged => "GATE_LAGGED",
///         }
///     }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_codes(&[GateError::Stopped, GateError::Lagged], "GATE_");
/// ```
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

/// Checks if a string is UPPER_SNAKE_CASE.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }

    if s.starts_with('_') || s.ends_with('_') {
        return false;
    }

    if s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
