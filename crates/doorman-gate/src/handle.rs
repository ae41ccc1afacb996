//! Read side of a running gate.

use crate::machine::FaultInfo;
use crate::routing::{route, RouteDecision, RouteTable};
use crate::runner::GateSnapshot;
use doorman_types::GateState;
use std::sync::Arc;
use tokio::sync::watch;

/// Cheap cloneable observer of a running gate.
///
/// A handle never mutates gate state; it reads the latest published
/// [`GateSnapshot`] and projects routing decisions from it. Clone freely:
/// every clone observes the same snapshots.
///
/// # Example
///
/// ```
/// use doorman_gate::{GateRunner, Screen};
/// use doorman_probe::testing::ScriptedProbe;
/// use doorman_source::testing::ScriptedSource;
/// use doorman_types::GateState;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = Arc::new(ScriptedSource::new());
/// let (runner, mut gate) = GateRunner::new(source, Arc::new(ScriptedProbe::new()));
/// tokio::spawn(runner.run());
///
/// gate.wait_for(GateState::LoggedOut).await;
/// let decision = gate.decide("/settings");
/// assert_eq!(decision.screen, Screen::Entry);
/// assert_eq!(decision.redirect.as_deref(), Some("/"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GateHandle {
    state_rx: watch::Receiver<GateSnapshot>,
    routes: Arc<RouteTable>,
}

impl GateHandle {
    pub(crate) fn new(state_rx: watch::Receiver<GateSnapshot>, routes: Arc<RouteTable>) -> Self {
        Self { state_rx, routes }
    }

    /// Latest published gate state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state_rx.borrow().state
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GateSnapshot {
        self.state_rx.borrow().clone()
    }

    /// Fault attached to the latest snapshot, present only while faulted.
    #[must_use]
    pub fn last_fault(&self) -> Option<FaultInfo> {
        self.state_rx.borrow().fault.clone()
    }

    /// Route table this handle projects through.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Routing decision for `requested` under the current state.
    #[must_use]
    pub fn decide(&self, requested: &str) -> RouteDecision {
        route(self.state(), requested, &self.routes)
    }

    /// Waits for the next published snapshot.
    ///
    /// Returns `false` once the gate has stopped and no further snapshot
    /// will arrive.
    pub async fn changed(&mut self) -> bool {
        self.state_rx.changed().await.is_ok()
    }

    /// Waits until the gate reaches `target`, including the case where it
    /// is already there.
    ///
    /// Returns `false` if the gate stops before reaching it.
    pub async fn wait_for(&mut self, target: GateState) -> bool {
        self.state_rx
            .wait_for(|snapshot| snapshot.state == target)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorman_types::Generation;

    fn snapshot(state: GateState, generation: Generation) -> GateSnapshot {
        GateSnapshot {
            state,
            generation,
            fault: None,
        }
    }

    #[tokio::test]
    async fn handle_reads_published_snapshots() {
        let (tx, rx) = watch::channel(snapshot(GateState::Unknown, Generation::ZERO));
        let gate = GateHandle::new(rx, Arc::new(RouteTable::default()));

        assert_eq!(gate.state(), GateState::Unknown);

        tx.send_replace(snapshot(GateState::Ready, Generation::ZERO.next()));
        assert_eq!(gate.state(), GateState::Ready);
        assert_eq!(gate.snapshot().generation.value(), 1);
    }

    #[tokio::test]
    async fn clones_observe_the_same_gate() {
        let (tx, rx) = watch::channel(snapshot(GateState::Unknown, Generation::ZERO));
        let gate = GateHandle::new(rx, Arc::new(RouteTable::default()));
        let clone = gate.clone();

        tx.send_replace(snapshot(GateState::LoggedOut, Generation::ZERO.next()));
        assert_eq!(gate.state(), GateState::LoggedOut);
        assert_eq!(clone.state(), GateState::LoggedOut);
    }

    #[tokio::test]
    async fn wait_for_returns_immediately_when_already_there() {
        let (tx, rx) = watch::channel(snapshot(GateState::Ready, Generation::ZERO));
        let mut gate = GateHandle::new(rx, Arc::new(RouteTable::default()));

        assert!(gate.wait_for(GateState::Ready).await);
        drop(tx);
    }

    #[tokio::test]
    async fn changed_reports_gate_shutdown() {
        let (tx, rx) = watch::channel(snapshot(GateState::Unknown, Generation::ZERO));
        let mut gate = GateHandle::new(rx, Arc::new(RouteTable::default()));

        drop(tx);
        assert!(!gate.changed().await);
    }
}
