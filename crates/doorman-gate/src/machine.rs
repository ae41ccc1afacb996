//! The pure gate state machine.
//!
//! [`GateMachine`] consumes exactly two kinds of input: a session change and
//! a finished resolution. A session change bumps the generation counter and
//! may order a new resolution; a finished resolution is applied only if its
//! generation still matches. Everything here is synchronous and allocation
//! light, so every race the async shell can produce reduces to an event
//! ordering that can be replayed in a plain unit test.

use chrono::{DateTime, Utc};
use doorman_types::{AccountStatus, GateState, Generation, IdentityId, Session};
use serde::Serialize;

/// Instruction to start one account-status resolution.
///
/// Issued by [`GateMachine::apply_session`] when the new session is present.
/// The captured generation must travel with the eventual [`Resolution`];
/// it is the only thing that distinguishes a current answer from a stale one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOrder {
    /// Generation current at the time the order was issued.
    pub generation: Generation,
    /// Identity the resolution is about.
    pub identity: IdentityId,
}

/// What a finished resolution concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The identity has a provisioned account profile.
    Complete,
    /// The backend definitively reported no profile. A normal outcome, not
    /// a failure.
    Incomplete,
    /// The check could not produce a definite answer.
    Failed {
        /// Stable error code of the underlying failure.
        code: &'static str,
        /// Human-readable failure description.
        message: String,
    },
}

/// A finished resolution, tagged with the generation it was ordered under.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Generation copied from the originating [`ResolveOrder`].
    pub generation: Generation,
    /// Identity copied from the originating [`ResolveOrder`].
    pub identity: IdentityId,
    /// What the check concluded.
    pub outcome: Outcome,
}

/// Whether the machine accepted a resolution or discarded it as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The resolution matched the current generation and was applied.
    Accepted,
    /// The resolution belonged to a superseded generation; no state changed.
    Stale,
}

/// Details of the most recent resolution failure.
///
/// Kept alongside [`GateState::Faulted`] so a retry affordance can say what
/// went wrong. Cleared by the next session change or accepted resolution.
#[derive(Debug, Clone, Serialize)]
pub struct FaultInfo {
    /// Generation the failed resolution ran under.
    pub generation: Generation,
    /// Identity the failed resolution was about.
    pub identity: IdentityId,
    /// Stable error code of the failure.
    pub code: &'static str,
    /// Human-readable failure description.
    pub message: String,
    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

/// Generation-guarded session/account state machine.
///
/// Owns the authoritative [`GateState`] and the generation counter. All
/// mutation goes through [`apply_session`](Self::apply_session) and
/// [`apply_resolution`](Self::apply_resolution); the caller (normally the
/// runner) is responsible for feeding events one at a time.
///
/// # Example
///
/// ```
/// use doorman_gate::machine::{GateMachine, Outcome, Resolution};
/// use doorman_types::{GateState, IdentityId, Session};
///
/// let mut machine = GateMachine::new();
/// assert_eq!(machine.state(), GateState::Unknown);
///
/// let order = machine
///     .apply_session(Session::signed_in(IdentityId::new("uid-1")))
///     .unwrap();
/// assert_eq!(machine.state(), GateState::CheckingAccount);
///
/// machine.apply_resolution(Resolution {
///     generation: order.generation,
///     identity: order.identity,
///     outcome: Outcome::Complete,
/// });
/// assert_eq!(machine.state(), GateState::Ready);
/// ```
#[derive(Debug)]
pub struct GateMachine {
    generation: Generation,
    session: Session,
    status: AccountStatus,
    state: GateState,
    last_fault: Option<FaultInfo>,
}

impl GateMachine {
    /// A machine that has not yet seen a session notification.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: Generation::ZERO,
            session: Session::signed_out(),
            status: AccountStatus::Unset,
            state: GateState::Unknown,
            last_fault: None,
        }
    }

    /// Current gate state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Latest accepted provisioning status.
    #[must_use]
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Most recent resolution failure, if the machine is currently faulted.
    #[must_use]
    pub fn last_fault(&self) -> Option<&FaultInfo> {
        self.last_fault.as_ref()
    }

    /// Applies a session change.
    ///
    /// Bumps the generation, which retroactively invalidates every
    /// resolution still in flight, resets the provisioning status and any
    /// recorded fault, and re-derives the state. Returns a [`ResolveOrder`]
    /// when the new session is present and therefore needs a provisioning
    /// check.
    pub fn apply_session(&mut self, session: Session) -> Option<ResolveOrder> {
        self.generation = self.generation.next();
        self.session = session;
        self.status = AccountStatus::Unset;
        self.last_fault = None;
        self.state = GateState::derive(self.session.is_present(), self.status);

        self.session.identity().map(|identity| ResolveOrder {
            generation: self.generation,
            identity: identity.clone(),
        })
    }

    /// Applies a finished resolution.
    ///
    /// A resolution whose generation does not match the current one is
    /// discarded without touching any state; that single comparison is the
    /// whole race guard. An accepted failure records a [`FaultInfo`]; an
    /// accepted success clears any previous one.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> Applied {
        if resolution.generation != self.generation {
            return Applied::Stale;
        }

        match resolution.outcome {
            Outcome::Complete => {
                self.status = AccountStatus::Complete;
                self.last_fault = None;
            }
            Outcome::Incomplete => {
                self.status = AccountStatus::Incomplete;
                self.last_fault = None;
            }
            Outcome::Failed { code, message } => {
                self.status = AccountStatus::Failed;
                self.last_fault = Some(FaultInfo {
                    generation: resolution.generation,
                    identity: resolution.identity,
                    code,
                    message,
                    at: Utc::now(),
                });
            }
        }

        self.state = GateState::derive(self.session.is_present(), self.status);
        Applied::Accepted
    }
}

impl Default for GateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(raw: &str) -> IdentityId {
        IdentityId::new(raw)
    }

    fn resolved(order: &ResolveOrder, outcome: Outcome) -> Resolution {
        Resolution {
            generation: order.generation,
            identity: order.identity.clone(),
            outcome,
        }
    }

    fn failed(code: &'static str) -> Outcome {
        Outcome::Failed {
            code,
            message: "boom".into(),
        }
    }

    // === Session transitions ===

    #[test]
    fn starts_unknown_at_generation_zero() {
        let machine = GateMachine::new();
        assert_eq!(machine.state(), GateState::Unknown);
        assert_eq!(machine.generation(), Generation::ZERO);
        assert!(machine.last_fault().is_none());
    }

    #[test]
    fn absent_session_logs_out_without_an_order() {
        let mut machine = GateMachine::new();
        let order = machine.apply_session(Session::signed_out());

        assert!(order.is_none());
        assert_eq!(machine.state(), GateState::LoggedOut);
        assert_eq!(machine.generation().value(), 1);
    }

    #[test]
    fn present_session_checks_and_orders_a_resolution() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        assert_eq!(machine.state(), GateState::CheckingAccount);
        assert_eq!(order.generation, machine.generation());
        assert_eq!(order.identity.as_str(), "uid-1");
    }

    #[test]
    fn generation_increases_on_every_session_event() {
        let mut machine = GateMachine::new();
        let mut previous = machine.generation();

        for session in [
            Session::signed_in(uid("uid-1")),
            Session::signed_out(),
            Session::signed_in(uid("uid-2")),
            Session::signed_in(uid("uid-2")),
            Session::signed_out(),
        ] {
            machine.apply_session(session);
            assert!(machine.generation() > previous);
            previous = machine.generation();
        }
    }

    // === Resolution outcomes ===

    #[test]
    fn complete_reaches_ready() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        let applied = machine.apply_resolution(resolved(&order, Outcome::Complete));
        assert_eq!(applied, Applied::Accepted);
        assert_eq!(machine.state(), GateState::Ready);
        assert_eq!(machine.status(), AccountStatus::Complete);
    }

    #[test]
    fn incomplete_needs_setup_and_is_not_a_fault() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        machine.apply_resolution(resolved(&order, Outcome::Incomplete));
        assert_eq!(machine.state(), GateState::NeedsSetup);
        assert!(machine.last_fault().is_none());
    }

    #[test]
    fn failure_faults_and_records_details() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        machine.apply_resolution(resolved(&order, failed("PROBE_TRANSPORT")));
        assert_eq!(machine.state(), GateState::Faulted);

        let fault = machine.last_fault().unwrap();
        assert_eq!(fault.code, "PROBE_TRANSPORT");
        assert_eq!(fault.generation, order.generation);
        assert_eq!(fault.identity.as_str(), "uid-1");
    }

    // === The generation guard ===

    #[test]
    fn stale_resolution_is_discarded() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        // The session disappears while the check is in flight.
        machine.apply_session(Session::signed_out());
        assert_eq!(machine.state(), GateState::LoggedOut);

        // The old check finally answers; it must change nothing.
        let applied = machine.apply_resolution(resolved(&order, Outcome::Complete));
        assert_eq!(applied, Applied::Stale);
        assert_eq!(machine.state(), GateState::LoggedOut);
        assert_eq!(machine.status(), AccountStatus::Unset);
    }

    #[test]
    fn resolution_for_a_superseded_login_is_discarded() {
        let mut machine = GateMachine::new();
        let first = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();
        let second = machine
            .apply_session(Session::signed_in(uid("uid-2")))
            .unwrap();

        // uid-1's slow answer arrives after uid-2 took over.
        assert_eq!(
            machine.apply_resolution(resolved(&first, Outcome::Complete)),
            Applied::Stale
        );
        assert_eq!(machine.state(), GateState::CheckingAccount);

        assert_eq!(
            machine.apply_resolution(resolved(&second, Outcome::Complete)),
            Applied::Accepted
        );
        assert_eq!(machine.state(), GateState::Ready);
    }

    #[test]
    fn unissued_generation_is_discarded_too() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        let ahead = Resolution {
            generation: order.generation.next(),
            identity: order.identity,
            outcome: Outcome::Complete,
        };
        assert_eq!(machine.apply_resolution(ahead), Applied::Stale);
        assert_eq!(machine.state(), GateState::CheckingAccount);
    }

    #[test]
    fn second_answer_for_the_same_generation_still_applies() {
        // The transport layer should not produce duplicates, but the machine
        // stays consistent if it does: last accepted answer wins.
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();

        machine.apply_resolution(resolved(&order, failed("PROBE_SERVER_STATUS")));
        assert_eq!(machine.state(), GateState::Faulted);

        machine.apply_resolution(resolved(&order, Outcome::Complete));
        assert_eq!(machine.state(), GateState::Ready);
        assert!(machine.last_fault().is_none());
    }

    // === Fault lifecycle ===

    #[test]
    fn session_change_clears_the_fault() {
        let mut machine = GateMachine::new();
        let order = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();
        machine.apply_resolution(resolved(&order, failed("SOURCE_MINT_FAILED")));
        assert!(machine.last_fault().is_some());

        machine.apply_session(Session::signed_out());
        assert!(machine.last_fault().is_none());
        assert_eq!(machine.state(), GateState::LoggedOut);
    }

    #[test]
    fn machine_is_not_stuck_after_a_fault() {
        let mut machine = GateMachine::new();
        let first = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();
        machine.apply_resolution(resolved(&first, failed("PROBE_TRANSPORT")));
        assert_eq!(machine.state(), GateState::Faulted);

        // The provider re-announces the session; a new check succeeds.
        let second = machine
            .apply_session(Session::signed_in(uid("uid-1")))
            .unwrap();
        assert_eq!(machine.state(), GateState::CheckingAccount);
        machine.apply_resolution(resolved(&second, Outcome::Complete));
        assert_eq!(machine.state(), GateState::Ready);
        assert!(machine.last_fault().is_none());
    }
}
