//! Identifier types: provider identities and session generations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity-provider user identifier.
///
/// The provider guarantees stability and uniqueness per user; doorman only
/// compares and logs these values, it never interprets them.
///
/// # Example
///
/// ```
/// use doorman_types::IdentityId;
///
/// let id = IdentityId::new("uid-4711");
/// assert_eq!(id.as_str(), "uid-4711");
/// assert_eq!(id.to_string(), "uid-4711");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates an identity from a provider-issued value.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Creates a random identity.
    ///
    /// Intended for tests and scripted providers; production identities
    /// always come from the provider.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Monotonic counter over session epochs.
///
/// Every session-change event starts a new generation. Asynchronous work
/// launched under generation `g` may only write gate state while `g` is
/// still current; anything else is stale and gets discarded.
///
/// # Example
///
/// ```
/// use doorman_types::Generation;
///
/// let g0 = Generation::ZERO;
/// let g1 = g0.next();
/// assert!(g1 > g0);
/// assert_eq!(g1.value(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any session event has been observed.
    pub const ZERO: Generation = Generation(0);

    /// Returns the following generation.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
