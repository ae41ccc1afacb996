//! The status probe contract.

use crate::ProbeError;
use async_trait::async_trait;
use doorman_types::BearerToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A definite answer about account provisioning.
///
/// Both variants are successful checks. `Incomplete` means the backend
/// positively confirmed the profile does not exist yet; it is never inferred
/// from an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioning {
    /// The identity has a completed account profile.
    Complete,
    /// The backend confirmed no profile exists yet.
    Incomplete,
}

impl fmt::Display for Provisioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// Performs one remote existence check for the authenticated identity.
///
/// The token is minted immediately before the call with a forced refresh;
/// implementations must not cache it or reuse it across checks.
/// Implementations bound each call with their own transport timeout — the
/// gate imposes none, it simply outlives slow checks and discards answers
/// that arrive after the session has moved on.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Checks whether the token's identity has a provisioned account.
    ///
    /// # Errors
    ///
    /// Any [`ProbeError`] means the state could not be determined; callers
    /// must treat it as unknown, never as `Incomplete`.
    async fn check(&self, token: &BearerToken) -> Result<Provisioning, ProbeError>;
}
