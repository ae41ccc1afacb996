//! Scripted provider for tests.
//!
//! [`ScriptedSource`] is a fully in-memory [`TokenSource`]: tests drive the
//! session from the outside (`sign_in`, `sign_out`, `emit_current`) and can
//! script mint outcomes to exercise authentication faults. Counters expose
//! how often tokens were minted and whether refresh was forced, so tests can
//! assert the gate never reuses a stale credential.
//!
//! # Example
//!
//! ```
//! use doorman_source::testing::ScriptedSource;
//! use doorman_source::TokenSource;
//! use doorman_types::{IdentityId, Session};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = ScriptedSource::new();
//! let mut events = provider.subscribe();
//! assert_eq!(events.recv().await, Some(Session::signed_out()));
//!
//! provider.sign_in(IdentityId::new("uid-1"));
//! assert!(events.recv().await.unwrap().is_present());
//!
//! let token = provider.mint_token(true).await.unwrap();
//! assert!(token.reveal().starts_with("token-uid-1"));
//! assert_eq!(provider.forced_mint_count(), 1);
//! # }
//! ```

use crate::{SessionEvents, SourceError, SubscriptionGuard, TokenSource, SESSION_EVENT_BUFFER};
use async_trait::async_trait;
use doorman_types::{BearerToken, IdentityId, Session};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, mpsc::Sender<Session>)>,
}

struct Inner {
    session: Mutex<Session>,
    registry: Mutex<Registry>,
    mint_script: Mutex<VecDeque<Result<BearerToken, SourceError>>>,
    mint_count: AtomicUsize,
    forced_mint_count: AtomicUsize,
    mint_serial: AtomicU64,
}

/// In-memory identity provider driven by the test.
///
/// Unscripted mints produce a unique token per call
/// (`token-<identity>-<serial>`), so two resolutions never observe the same
/// credential, which is the freshness a forced refresh buys from a real
/// provider. Clones share the same provider.
#[derive(Clone)]
pub struct ScriptedSource {
    inner: Arc<Inner>,
}

impl ScriptedSource {
    /// Creates a provider with no current session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(Session::signed_out()),
                registry: Mutex::new(Registry::default()),
                mint_script: Mutex::new(VecDeque::new()),
                mint_count: AtomicUsize::new(0),
                forced_mint_count: AtomicUsize::new(0),
                mint_serial: AtomicU64::new(0),
            }),
        }
    }

    /// Creates a provider already signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: IdentityId) -> Self {
        let source = Self::new();
        *source.inner.session.lock() = Session::signed_in(identity);
        source
    }

    /// Replaces the current session and notifies all subscribers.
    pub fn emit(&self, session: Session) {
        *self.inner.session.lock() = session.clone();
        self.fan_out(session);
    }

    /// Re-delivers the current session to all subscribers.
    ///
    /// Mirrors a provider-side refresh: same session, new notification.
    pub fn emit_current(&self) {
        let session = self.inner.session.lock().clone();
        self.fan_out(session);
    }

    /// Signs in as `identity` and notifies subscribers.
    pub fn sign_in(&self, identity: IdentityId) {
        self.emit(Session::signed_in(identity));
    }

    /// Signs out and notifies subscribers.
    pub fn sign_out(&self) {
        self.emit(Session::signed_out());
    }

    /// Queues a mint outcome consumed before generated tokens.
    pub fn script_mint(&self, outcome: Result<BearerToken, SourceError>) {
        self.inner.mint_script.lock().push_back(outcome);
    }

    /// Total `mint_token` calls observed.
    #[must_use]
    pub fn mint_count(&self) -> usize {
        self.inner.mint_count.load(Ordering::SeqCst)
    }

    /// `mint_token` calls that requested a forced refresh.
    #[must_use]
    pub fn forced_mint_count(&self) -> usize {
        self.inner.forced_mint_count.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.inner.registry.lock().subscribers.len()
    }

    /// Drops every live subscription, ending their event streams.
    ///
    /// Mirrors provider teardown: consumers blocked on `recv` observe end
    /// of stream.
    pub fn close(&self) {
        self.inner.registry.lock().subscribers.clear();
    }

    fn fan_out(&self, session: Session) {
        let mut registry = self.inner.registry.lock();
        // A full or closed channel means the subscriber is gone or stalled;
        // drop it rather than block the provider.
        registry
            .subscribers
            .retain(|(_, tx)| tx.try_send(session.clone()).is_ok());
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenSource for ScriptedSource {
    fn subscribe(&self) -> SessionEvents {
        let (tx, rx) = mpsc::channel(SESSION_EVENT_BUFFER);

        let id = {
            let mut registry = self.inner.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;

            // Initial event: the session current at subscription time.
            let current = self.inner.session.lock().clone();
            let _ = tx.try_send(current);

            registry.subscribers.push((id, tx));
            id
        };

        let inner = Arc::clone(&self.inner);
        let guard = SubscriptionGuard::new(move || {
            inner
                .registry
                .lock()
                .subscribers
                .retain(|(sub_id, _)| *sub_id != id);
        });

        SessionEvents::with_guard(rx, guard)
    }

    async fn mint_token(&self, force_refresh: bool) -> Result<BearerToken, SourceError> {
        self.inner.mint_count.fetch_add(1, Ordering::SeqCst);
        if force_refresh {
            self.inner.forced_mint_count.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(outcome) = self.inner.mint_script.lock().pop_front() {
            return outcome;
        }

        let session = self.inner.session.lock().clone();
        match session.identity() {
            Some(identity) => {
                let serial = self.inner.mint_serial.fetch_add(1, Ordering::SeqCst);
                Ok(BearerToken::new(format!("token-{identity}-{serial}")))
            }
            None => Err(SourceError::NoSession),
        }
    }
}
