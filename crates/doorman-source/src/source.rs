//! The token source contract.

use crate::{SessionEvents, SourceError};
use async_trait::async_trait;
use doorman_types::BearerToken;

/// What doorman requires of an identity provider.
///
/// Implementations wrap the real provider SDK; the gate is constructed with
/// an explicit `Arc<dyn TokenSource>`-shaped dependency instead of reaching
/// for a process-wide client, so tests swap in
/// [`ScriptedSource`](crate::testing::ScriptedSource).
///
/// # Subscription semantics
///
/// `subscribe` must deliver the current session as the subscriber's first
/// event (synchronously buffered or on the next tick), then exactly one
/// event per change, in change order. Multiple subscribers each get their
/// own stream.
///
/// # Minting semantics
///
/// `mint_token` mints for whatever session is current at call time. With
/// `force_refresh` the provider must bypass any cached token it holds —
/// provisioning checks rely on this because backend claims can change
/// between mints.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Opens a session event stream for this subscriber.
    fn subscribe(&self) -> SessionEvents;

    /// Mints a bearer token for the current session.
    ///
    /// # Errors
    ///
    /// [`SourceError::NoSession`] when no session exists,
    /// [`SourceError::Mint`] when the provider cannot produce a token.
    async fn mint_token(&self, force_refresh: bool) -> Result<BearerToken, SourceError>;
}
