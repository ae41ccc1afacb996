//! Account-provisioning status as reported by the backend check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the account-provisioning check for one identity.
///
/// Produced only by the status probe, always tied to the generation it was
/// requested under. `Incomplete` is a *successful* check (the backend
/// definitively said the profile does not exist yet); `Failed` means the
/// check could not determine anything. The two must never be conflated — an
/// error is not evidence that setup is pending.
///
/// # Example
///
/// ```
/// use doorman_types::AccountStatus;
///
/// assert!(AccountStatus::Unset.is_pending());
/// assert!(AccountStatus::Complete.is_settled());
/// assert!(AccountStatus::Failed.is_settled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// No check has completed for the current generation.
    Unset,
    /// The identity has a fully-provisioned account.
    Complete,
    /// The backend definitively reported no account profile yet.
    Incomplete,
    /// The check failed; provisioning state is unknown.
    Failed,
}

impl AccountStatus {
    /// Returns whether a check is still outstanding.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns whether a check has completed (successfully or not).
    #[must_use]
    pub fn is_settled(self) -> bool {
        !self.is_pending()
    }

    /// Returns the status name as a static string.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
