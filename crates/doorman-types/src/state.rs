//! The authoritative gate state consumed by routing.

use crate::AccountStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single source of truth for routing eligibility.
///
/// Derived deterministically from the latest session and the latest accepted
/// provisioning status:
///
/// | Session present | AccountStatus | GateState |
/// |-----------------|---------------|-----------|
/// | false | — | `LoggedOut` |
/// | true | `Unset` | `CheckingAccount` |
/// | true | `Complete` | `Ready` |
/// | true | `Incomplete` | `NeedsSetup` |
/// | true | `Failed` | `Faulted` |
///
/// `Unknown` exists only before the first session notification arrives; no
/// combination of inputs derives it.
///
/// # Example
///
/// ```
/// use doorman_types::{AccountStatus, GateState};
///
/// assert_eq!(
///     GateState::derive(true, AccountStatus::Complete),
///     GateState::Ready,
/// );
/// assert_eq!(
///     GateState::derive(false, AccountStatus::Complete),
///     GateState::LoggedOut,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Before the first session notification.
    Unknown,
    /// No session exists.
    LoggedOut,
    /// A session exists; the provisioning check is in flight.
    CheckingAccount,
    /// The identity has no account profile yet; setup is required.
    NeedsSetup,
    /// Session present and account fully provisioned.
    Ready,
    /// The provisioning check failed; routed like `NeedsSetup`, surfaced
    /// to diagnostics as a fault.
    Faulted,
}

impl GateState {
    /// Derives the gate state from session presence and provisioning status.
    ///
    /// This is the whole transition table; the state machine never assigns a
    /// post-session state any other way.
    #[must_use]
    pub fn derive(session_present: bool, status: AccountStatus) -> Self {
        if !session_present {
            return Self::LoggedOut;
        }
        match status {
            AccountStatus::Unset => Self::CheckingAccount,
            AccountStatus::Complete => Self::Ready,
            AccountStatus::Incomplete => Self::NeedsSetup,
            AccountStatus::Failed => Self::Faulted,
        }
    }

    /// Returns whether protected screens may render.
    ///
    /// Only `Ready` qualifies; every other state either hides protected
    /// content behind a placeholder or redirects away from it.
    #[must_use]
    pub fn allows_protected(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns whether routing should show a neutral loading placeholder.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Unknown | Self::CheckingAccount)
    }

    /// Returns whether routing confines the user to the setup path.
    ///
    /// True for `NeedsSetup` and for `Faulted`, which redirects identically
    /// but renders a retry affordance instead of the setup form.
    #[must_use]
    pub fn confines_to_setup(self) -> bool {
        matches!(self, Self::NeedsSetup | Self::Faulted)
    }

    /// Returns the state name as a static string.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::LoggedOut => "logged_out",
            Self::CheckingAccount => "checking_account",
            Self::NeedsSetup => "needs_setup",
            Self::Ready => "ready",
            Self::Faulted => "faulted",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
