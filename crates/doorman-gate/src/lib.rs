//! The session/account gate.
//!
//! Doorman's core: a generation-guarded state machine that reconciles the
//! identity provider's session, the backend's account-provisioning status,
//! and the screen the user is allowed to see, and stays race-free while all
//! three change underneath it.
//!
//! # Architecture
//!
//! ```text
//! TokenSource ──── session events ────▶ GateRunner ── snapshots ──▶ GateHandle
//!      ▲                                 │      ▲                       │
//!      │ mint_token(force)   spawns one  │      │ completion            │
//!      │                     per order   │      │ (generation-tagged)   ▼
//!      └────────── resolution task ◀─────┘      │                 decide(path)
//!                        │                      │                       │
//!                        └── StatusProbe ───────┘                       ▼
//!                                                                RouteDecision
//! ```
//!
//! One task owns the [`GateMachine`] and is its only writer. Session events
//! and resolution completions are applied strictly one at a time, so the
//! machine needs no locks; readers get immutable [`GateSnapshot`]s over a
//! watch channel.
//!
//! # The generation guard
//!
//! Every session change bumps a monotonic generation counter and every
//! resolution carries the generation it was ordered under. A completion
//! whose generation no longer matches is discarded, which is the entire
//! defense against the classic race: rapid sign-in, sign-out, sign-in with
//! a slow provisioning check still in flight from the first session. No
//! "is navigating" flag, no cancellation plumbing; stale answers simply
//! fail the comparison.
//!
//! # Module Map
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`machine`] | Pure state machine: [`GateMachine`], [`Resolution`], the guard |
//! | [`runner`] | Async shell: [`GateRunner`], [`GateSnapshot`] |
//! | [`handle`] | Read side: [`GateHandle`] |
//! | [`routing`] | Pure projection: [`route`], [`RouteTable`], [`RouteDecision`] |
//! | [`config`] | TOML configuration: [`GateConfig`] |
//!
//! # Design Principles
//!
//! - **Single writer** — only the runner's event loop mutates the machine;
//!   the loop itself is the synchronization mechanism.
//! - **Logical cancellation** — superseded resolutions are never aborted,
//!   their results are discarded by the generation comparison.
//! - **Errors are not answers** — a failed check faults the gate; it is
//!   never rounded to "account incomplete" or "account complete".
//! - **Pure edges** — state derivation and the routing projection are plain
//!   functions, testable without a runtime.

pub mod config;
pub mod handle;
pub mod machine;
pub mod routing;
pub mod runner;

// Re-export the gate surface
pub use config::{BackendConfig, ConfigError, GateConfig, ProbeConfig};
pub use handle::GateHandle;
pub use machine::{Applied, FaultInfo, GateMachine, Outcome, Resolution, ResolveOrder};
pub use routing::{route, RouteDecision, RouteTable, Screen};
pub use runner::{GateRunner, GateSnapshot};
