//! Identity-provider boundary for doorman.
//!
//! The provider is a black box: it signs users in and out through flows this
//! workspace does not model, and all doorman ever sees of it is the
//! [`TokenSource`] contract — a stream of [`Session`](doorman_types::Session)
//! snapshots plus on-demand token minting.
//!
//! # Contract
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | [`TokenSource::subscribe`] | Delivers the current session as the first event, then one event per change, in order |
//! | [`TokenSource::mint_token`] | Mints a bearer token for the current session; `force_refresh` bypasses any provider-side cache |
//!
//! Dropping the returned [`SessionEvents`] detaches the subscription; a
//! gate's subscription therefore lives exactly as long as the gate itself.
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
//!
//! // The current (absent) session arrives first.
//! assert_eq!(events.recv().await, Some(Session::signed_out()));
//!
//! provider.sign_in(IdentityId::new("uid-1"));
//! let session = events.recv().await.unwrap();
//! assert!(session.is_present());
//! # }
//! ```

pub mod error;
pub mod events;
pub mod source;
pub mod testing;

pub use error::SourceError;
pub use events::{SessionEvents, SubscriptionGuard, SESSION_EVENT_BUFFER};
pub use source::TokenSource;
