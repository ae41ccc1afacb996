//! Session event stream delivered to a single subscriber.

use doorman_types::Session;
use std::fmt;
use tokio::sync::mpsc;

/// Buffer size for a subscriber's session-event channel.
///
/// Session changes are rare (sign-in, sign-out, provider refresh); 64
/// outstanding events means the consumer has stalled, at which point the
/// provider may drop events rather than block.
pub const SESSION_EVENT_BUFFER: usize = 64;

/// Runs a detach action when the subscription is dropped.
///
/// Providers hand one of these to [`SessionEvents`] so that a subscriber
/// going away removes its registration instead of leaving a dead channel
/// behind.
pub struct SubscriptionGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Creates a guard that runs `detach` exactly once, on drop.
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubscriptionGuard")
    }
}

/// Single-consumer stream of [`Session`] snapshots.
///
/// Obtained from [`TokenSource::subscribe`](crate::TokenSource::subscribe).
/// The first event reflects the session current at subscription time; each
/// further event reflects one change, delivered in order. Dropping the
/// stream detaches the subscription.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::Receiver<Session>,
    _guard: Option<SubscriptionGuard>,
}

impl SessionEvents {
    /// Wraps a receiver without a detach action.
    pub fn new(rx: mpsc::Receiver<Session>) -> Self {
        Self { rx, _guard: None }
    }

    /// Wraps a receiver; `guard` runs when this stream is dropped.
    pub fn with_guard(rx: mpsc::Receiver<Session>, guard: SubscriptionGuard) -> Self {
        Self {
            rx,
            _guard: Some(guard),
        }
    }

    /// Creates a connected sender/stream pair.
    ///
    /// Convenience for tests and providers without registration state.
    pub fn channel() -> (mpsc::Sender<Session>, Self) {
        let (tx, rx) = mpsc::channel(SESSION_EVENT_BUFFER);
        (tx, Self::new(rx))
    }

    /// Receives the next session snapshot.
    ///
    /// Returns `None` once the provider side has closed and all buffered
    /// events are drained.
    pub async fn recv(&mut self) -> Option<Session> {
        self.rx.recv().await
    }

    /// Receives without waiting.
    pub fn try_recv(&mut self) -> Option<Session> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorman_types::IdentityId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (tx, mut events) = SessionEvents::channel();

        tx.send(Session::signed_out()).await.unwrap();
        tx.send(Session::signed_in(IdentityId::new("uid-1")))
            .await
            .unwrap();

        assert_eq!(events.recv().await, Some(Session::signed_out()));
        assert_eq!(
            events.recv().await,
            Some(Session::signed_in(IdentityId::new("uid-1")))
        );
    }

    #[tokio::test]
    async fn recv_returns_none_after_sender_drop() {
        let (tx, mut events) = SessionEvents::channel();
        drop(tx);
        assert_eq!(events.recv().await, None);
    }

    #[tokio::test]
    async fn try_recv_does_not_wait() {
        let (tx, mut events) = SessionEvents::channel();
        assert_eq!(events.try_recv(), None);

        tx.send(Session::signed_out()).await.unwrap();
        assert_eq!(events.try_recv(), Some(Session::signed_out()));
    }

    #[test]
    fn guard_runs_once_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let guard = {
            let count = Arc::clone(&count);
            SubscriptionGuard::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        assert_eq!(count.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_stream_runs_guard() {
        let count = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = mpsc::channel(SESSION_EVENT_BUFFER);
        let guard = {
            let count = Arc::clone(&count);
            SubscriptionGuard::new(move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        let events = SessionEvents::with_guard(rx, guard);
        drop(events);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
