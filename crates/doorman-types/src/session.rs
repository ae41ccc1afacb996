//! Session snapshots observed from the identity provider.

use crate::IdentityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the identity provider's login state.
///
/// A session is created, replaced, and cleared exclusively by the provider;
/// the gate observes a stream of these snapshots and never mutates one. A
/// snapshot either carries the signed-in identity or records that no session
/// exists.
///
/// # Example
///
/// ```
/// use doorman_types::{IdentityId, Session};
///
/// let signed_out = Session::signed_out();
/// assert!(!signed_out.is_present());
/// assert!(signed_out.identity().is_none());
///
/// let signed_in = Session::signed_in(IdentityId::new("uid-1"));
/// assert!(signed_in.is_present());
/// assert_eq!(signed_in.identity().unwrap().as_str(), "uid-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<IdentityId>,
}

impl Session {
    /// A session for the given identity.
    #[must_use]
    pub fn signed_in(identity: IdentityId) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// The absent session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self { identity: None }
    }

    /// Returns whether a session exists.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.identity.is_some()
    }

    /// Returns the signed-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityId> {
        self.identity.as_ref()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            Some(id) => write!(f, "signed-in({id})"),
            None => write!(f, "signed-out"),
        }
    }
}
