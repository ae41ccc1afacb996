//! Bearer credentials minted by the identity provider.

use std::fmt;

/// Short-lived bearer credential for a single backend call.
///
/// Tokens are minted on demand from the current session and are not cached
/// beyond the call they were minted for. Provisioning checks always mint
/// with a forced refresh, because provisioning can complete between mints
/// and a stale token could certify an outdated claim set.
///
/// `Debug` and `Display` redact the secret; use [`BearerToken::reveal`] at
/// the point the credential actually leaves the process.
///
/// # Example
///
/// ```
/// use doorman_types::BearerToken;
///
/// let token = BearerToken::new("eyJ...signature");
/// assert_eq!(token.reveal(), "eyJ...signature");
/// assert_eq!(format!("{token:?}"), "BearerToken(****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a freshly minted credential.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw credential for transmission.
    #[must_use]
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(****)")
    }
}

impl fmt::Display for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "****")
    }
}
