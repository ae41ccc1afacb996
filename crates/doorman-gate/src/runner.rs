//! Async shell around the state machine.
//!
//! [`GateRunner`] owns the machine and is its only writer. It consumes the
//! provider's session stream and a completion channel fed by spawned
//! resolution tasks, applies both through the machine one event at a time,
//! and publishes a [`GateSnapshot`] on every accepted transition. Readers
//! observe snapshots through [`GateHandle`]; nothing outside the runner can
//! mutate gate state.

use crate::handle::GateHandle;
use crate::machine::{Applied, FaultInfo, GateMachine, Outcome, Resolution, ResolveOrder};
use crate::routing::RouteTable;
use doorman_probe::{Provisioning, StatusProbe};
use doorman_source::{SessionEvents, TokenSource};
use doorman_types::{ErrorCode, GateState, Generation, Session};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Buffer for resolution completions awaiting the runner.
const COMPLETION_BUFFER: usize = 16;

/// One published view of the gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateSnapshot {
    /// Gate state at publication time.
    pub state: GateState,
    /// Generation at publication time.
    pub generation: Generation,
    /// Fault recorded with the state, present only while faulted.
    pub fault: Option<FaultInfo>,
}

/// Drives the gate: subscribes to the provider, launches resolutions, and
/// publishes state.
///
/// Constructed together with the [`GateHandle`] that observes it; consumed
/// by [`run`](Self::run), which loops until the provider's session stream
/// ends.
///
/// # Example
///
/// ```
/// use doorman_gate::GateRunner;
/// use doorman_probe::testing::ScriptedProbe;
/// use doorman_source::testing::ScriptedSource;
/// use doorman_types::GateState;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = Arc::new(ScriptedSource::new());
/// let probe = Arc::new(ScriptedProbe::new());
///
/// let (runner, mut gate) = GateRunner::new(Arc::clone(&source), probe);
/// tokio::spawn(runner.run());
///
/// assert!(gate.wait_for(GateState::LoggedOut).await);
/// # }
/// ```
pub struct GateRunner<S, P> {
    machine: GateMachine,
    events: SessionEvents,
    source: Arc<S>,
    probe: Arc<P>,
    completion_tx: mpsc::Sender<Resolution>,
    completion_rx: mpsc::Receiver<Resolution>,
    state_tx: watch::Sender<GateSnapshot>,
}

impl<S, P> GateRunner<S, P>
where
    S: TokenSource + 'static,
    P: StatusProbe + 'static,
{
    /// Creates a runner with the default route table.
    ///
    /// Subscribes to the provider immediately, so session events from before
    /// [`run`](Self::run) is polled are buffered rather than lost.
    #[must_use]
    pub fn new(source: Arc<S>, probe: Arc<P>) -> (Self, GateHandle) {
        Self::with_routes(source, probe, RouteTable::default())
    }

    /// Creates a runner whose handle projects routes through `routes`.
    #[must_use]
    pub fn with_routes(source: Arc<S>, probe: Arc<P>, routes: RouteTable) -> (Self, GateHandle) {
        let machine = GateMachine::new();
        let events = source.subscribe();
        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_BUFFER);
        let (state_tx, state_rx) = watch::channel(GateSnapshot {
            state: machine.state(),
            generation: machine.generation(),
            fault: None,
        });

        let handle = GateHandle::new(state_rx, Arc::new(routes));
        let runner = Self {
            machine,
            events,
            source,
            probe,
            completion_tx,
            completion_rx,
            state_tx,
        };
        (runner, handle)
    }

    /// Runs the gate's event loop.
    ///
    /// This method consumes the runner and processes events until the
    /// provider's session stream closes. Dropping the returned future mid
    /// flight leaves in-flight resolution tasks running; they fail to send
    /// their completion and stop.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let (runner, gate) = GateRunner::new(source, probe);
    /// tokio::spawn(runner.run());
    /// ```
    pub async fn run(mut self) {
        info!("Gate runner started");

        loop {
            tokio::select! {
                // Priority: session changes supersede completions
                biased;

                event = self.events.recv() => {
                    match event {
                        Some(session) => self.handle_session(session),
                        None => {
                            info!("Gate runner: session stream closed");
                            break;
                        }
                    }
                }

                completion = self.completion_rx.recv() => {
                    match completion {
                        Some(resolution) => self.handle_resolution(resolution),
                        // Unreachable while the runner holds its own sender.
                        None => break,
                    }
                }
            }
        }

        info!("Gate runner stopped");
    }

    fn handle_session(&mut self, session: Session) {
        debug!(session = %session, "Session changed");

        if let Some(order) = self.machine.apply_session(session) {
            self.launch_resolution(order);
        }
        self.publish();
    }

    fn handle_resolution(&mut self, resolution: Resolution) {
        let generation = resolution.generation;

        match self.machine.apply_resolution(resolution) {
            Applied::Accepted => {
                debug!(
                    generation = %generation,
                    state = %self.machine.state(),
                    "Resolution applied"
                );
                self.publish();
            }
            Applied::Stale => {
                warn!(
                    stale = %generation,
                    current = %self.machine.generation(),
                    "Discarding stale resolution"
                );
            }
        }
    }

    /// Spawns one resolution task. The task owns clones of the provider and
    /// probe, reports back over the completion channel, and is never
    /// aborted: a superseded result is discarded by the generation guard
    /// instead.
    fn launch_resolution(&self, order: ResolveOrder) {
        debug!(
            generation = %order.generation,
            identity = %order.identity,
            "Starting account check"
        );

        let source = Arc::clone(&self.source);
        let probe = Arc::clone(&self.probe);
        let completion_tx = self.completion_tx.clone();

        tokio::spawn(async move {
            let outcome = resolve(source.as_ref(), probe.as_ref(), &order).await;
            let resolution = Resolution {
                generation: order.generation,
                identity: order.identity,
                outcome,
            };
            // Send only fails once the runner has stopped.
            let _ = completion_tx.send(resolution).await;
        });
    }

    fn publish(&self) {
        self.state_tx.send_replace(GateSnapshot {
            state: self.machine.state(),
            generation: self.machine.generation(),
            fault: self.machine.last_fault().cloned(),
        });
    }
}

/// Performs one account-status resolution: force-refresh a token, probe the
/// backend, fold both fallible steps into an [`Outcome`].
///
/// A provisioning gap can close between two mints, so a cached token must
/// never satisfy this call; refresh is always forced. `Incomplete` is a
/// successful outcome and is not logged as a failure.
async fn resolve<S, P>(source: &S, probe: &P, order: &ResolveOrder) -> Outcome
where
    S: TokenSource + ?Sized,
    P: StatusProbe + ?Sized,
{
    let token = match source.mint_token(true).await {
        Ok(token) => token,
        Err(e) => {
            warn!(generation = %order.generation, code = e.code(), "Token mint failed");
            return Outcome::Failed {
                code: e.code(),
                message: e.to_string(),
            };
        }
    };

    match probe.check(&token).await {
        Ok(Provisioning::Complete) => Outcome::Complete,
        Ok(Provisioning::Incomplete) => Outcome::Incomplete,
        Err(e) => {
            warn!(generation = %order.generation, code = e.code(), "Account check failed");
            Outcome::Failed {
                code: e.code(),
                message: e.to_string(),
            }
        }
    }
}
