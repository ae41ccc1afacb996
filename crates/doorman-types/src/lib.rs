//! Core types for the doorman session/account gate.
//!
//! Doorman reconciles three independently-changing facts on behalf of a
//! client application: whether an identity-provider session exists, whether
//! that identity has a fully-provisioned backend account, and which screen
//! the user is currently allowed to see. This crate holds the vocabulary the
//! other crates speak; it has no I/O and no async code.
//!
//! # Crate Architecture
//!
//! ```text
//! doorman-types   (IdentityId, Session, BearerToken, AccountStatus, GateState)
//!     ↑                  ↑
//! doorman-source    doorman-probe
//! (TokenSource)     (StatusProbe)
//!     ↑                  ↑
//!     └── doorman-gate ──┘
//!         (GateMachine, GateRunner, routing projection)
//! ```
//!
//! # Core Types
//!
//! | Type | Role |
//! |------|------|
//! | [`IdentityId`] | Opaque provider-issued user identifier |
//! | [`Session`] | Snapshot of the provider's login state |
//! | [`BearerToken`] | Short-lived credential for one backend call |
//! | [`Generation`] | Monotonic counter over session epochs |
//! | [`AccountStatus`] | Provisioning check outcome |
//! | [`GateState`] | The single authoritative routing state |
//!
//! # Design Principles
//!
//! - **Observation, not ownership** — a [`Session`] is a snapshot of what the
//!   identity provider reported; nothing in doorman mutates it.
//! - **Deterministic derivation** — [`GateState`] is a pure function of the
//!   latest session and the latest accepted [`AccountStatus`]; see
//!   [`GateState::derive`].
//! - **Errors carry codes** — every error enum implements [`ErrorCode`] so
//!   diagnostics stay machine-readable across crate boundaries.

pub mod error;
pub mod id;
pub mod session;
pub mod state;
pub mod status;
pub mod token;

// Re-export core types
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{Generation, IdentityId};
pub use session::Session;
pub use state::GateState;
pub use status::AccountStatus;
pub use token::BearerToken;
