//! Account-provisioning status probe.
//!
//! Given a freshly minted bearer token, the probe asks the backend whether
//! the authenticated identity has a completed account profile and classifies
//! the answer. The gate treats the probe as its only window into
//! provisioning: everything it knows about an account it learned from one
//! [`StatusProbe::check`] call.
//!
//! # Classification
//!
//! | Backend answer | Outcome |
//! |----------------|---------|
//! | Success carrying a profile body | `Ok(Provisioning::Complete)` |
//! | Definite "not found" | `Ok(Provisioning::Incomplete)` |
//! | Timeout, connect failure | `Err(ProbeError::Transport)` |
//! | Any other status | `Err(ProbeError::Server)` |
//! | Success with missing/malformed body | `Err(ProbeError::Payload)` |
//!
//! The two `Ok` arms are the only real answers; an error never gets rounded
//! to one of them. "Not found" in particular is a successful check (the
//! backend definitively said the profile does not exist yet) and must never
//! be produced from a failure.

pub mod error;
pub mod http;
pub mod probe;
pub mod testing;

pub use error::ProbeError;
pub use http::{HttpStatusProbe, DEFAULT_TIMEOUT_SECS};
pub use probe::{Provisioning, StatusProbe};
