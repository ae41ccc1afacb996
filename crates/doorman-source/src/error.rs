//! Provider-boundary errors.

use doorman_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the identity-provider boundary.
///
/// Minting errors are authentication faults: the gate folds them into a
/// failed provisioning check rather than crashing, and the user recovers by
/// re-authenticating.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SourceError {
    /// Token requested while no session exists.
    #[error("no session to mint a token for")]
    NoSession,

    /// The provider failed to mint a token for the current session.
    #[error("token mint failed: {reason}")]
    Mint {
        /// Provider-reported failure detail.
        reason: String,
    },

    /// The provider has shut down and will emit no further events.
    #[error("session source closed")]
    Closed,
}

impl ErrorCode for SourceError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoSession => "SOURCE_NO_SESSION",
            Self::Mint { .. } => "SOURCE_MINT_FAILED",
            Self::Closed => "SOURCE_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Signing in creates the missing session.
            Self::NoSession => true,
            // Mint failures are typically transient (expired refresh
            // credential, provider hiccup).
            Self::Mint { .. } => true,
            Self::Closed => false,
        }
    }
}
