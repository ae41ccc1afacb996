//! Test doubles for the probe contract.
//!
//! [`ScriptedProbe`] answers from a queue of pre-loaded outcomes and records
//! every call, so state-machine tests can drive provisioning checks without
//! a backend. A probe can also be *held*: checks block until released, which
//! lets a test land a session change while a check is mid-flight.

use crate::{ProbeError, Provisioning, StatusProbe};
use async_trait::async_trait;
use doorman_types::BearerToken;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Scripted [`StatusProbe`] for tests.
///
/// Outcomes are served in FIFO order from the script; when the script runs
/// dry the probe answers [`Provisioning::Complete`]. Every call is counted
/// and the bearer token it carried is recorded.
///
/// # Example
///
/// ```
/// use doorman_probe::{Provisioning, StatusProbe};
/// use doorman_probe::testing::ScriptedProbe;
/// use doorman_types::BearerToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let probe = ScriptedProbe::new();
/// probe.script(Ok(Provisioning::Incomplete));
///
/// let first = probe.check(&BearerToken::new("t-1")).await.unwrap();
/// assert_eq!(first, Provisioning::Incomplete);
/// assert_eq!(probe.calls(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    script: Mutex<VecDeque<Result<Provisioning, ProbeError>>>,
    tokens: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl ScriptedProbe {
    /// Creates a probe with an empty script. Checks answer `Complete` until
    /// outcomes are scripted.
    #[must_use]
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                script: Mutex::new(VecDeque::new()),
                tokens: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                gate,
            }),
        }
    }

    /// Queues the outcome for the next unanswered check.
    pub fn script(&self, outcome: Result<Provisioning, ProbeError>) {
        self.inner.script.lock().push_back(outcome);
    }

    /// Holds the probe: subsequent checks block until [`ProbeRelease::release`]
    /// is called. Calls made while held still count and still consume the
    /// script once released.
    pub fn hold(&self) -> ProbeRelease {
        // send_replace stores the value even when no check is subscribed yet.
        self.inner.gate.send_replace(false);
        ProbeRelease {
            gate: self.inner.gate.clone(),
        }
    }

    /// Number of checks answered or currently blocked.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Bearer tokens seen so far, in call order.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.inner.tokens.lock().clone()
    }
}

impl Default for ScriptedProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases checks blocked by [`ScriptedProbe::hold`].
#[derive(Debug)]
pub struct ProbeRelease {
    gate: watch::Sender<bool>,
}

impl ProbeRelease {
    /// Unblocks all held checks. Further checks answer immediately.
    pub fn release(self) {
        self.gate.send_replace(true);
    }
}

#[async_trait]
impl StatusProbe for ScriptedProbe {
    async fn check(&self, token: &BearerToken) -> Result<Provisioning, ProbeError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.tokens.lock().push(token.reveal().to_string());

        let mut open = self.inner.gate.subscribe();
        // Held probes park here until the test releases them.
        let _ = open.wait_for(|open| *open).await;

        match self.inner.script.lock().pop_front() {
            Some(outcome) => outcome,
            None => Ok(Provisioning::Complete),
        }
    }
}
