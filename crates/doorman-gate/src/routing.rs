//! Pure routing projection.
//!
//! [`route`] maps `(GateState, requested path)` to a [`RouteDecision`]. It
//! holds no state, performs no navigation, and never consults the network;
//! the adapter that owns the real router applies the decision. The adapter
//! must apply a redirect before rendering anything, so no frame shows
//! protected content under a state that forbids it.

use doorman_types::GateState;
use serde::{Deserialize, Serialize};

/// Which screen category the adapter should render.
///
/// Protected content renders only under [`Screen::Protected`]; every other
/// category is a placeholder or a gate-owned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Neutral placeholder while the gate has not settled.
    Loading,
    /// Public entry page with the sign-in affordance.
    Entry,
    /// Account setup form.
    Setup,
    /// Recoverable failure page with a retry affordance.
    Retry,
    /// Whatever protected screen the requested path names.
    Protected,
}

/// One routing decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    /// What may render.
    pub screen: Screen,
    /// Path the screen renders at. Equals the redirect target when one is
    /// present.
    pub render_path: String,
    /// Navigation the adapter must apply before rendering, if any.
    pub redirect: Option<String>,
}

/// Path anchors the projection steers between.
///
/// # Example
///
/// ```
/// use doorman_gate::RouteTable;
///
/// let routes = RouteTable::default();
/// assert_eq!(routes.entry, "/");
/// assert_eq!(routes.setup, "/setaccount");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    /// Public entry path, the only page reachable while logged out.
    pub entry: String,
    /// Account setup path.
    pub setup: String,
    /// Default protected landing path.
    pub landing: String,
    /// Sign-in alias; redirected to the landing path once ready.
    pub login_alias: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            entry: "/".into(),
            setup: "/setaccount".into(),
            landing: "/".into(),
            login_alias: "/login".into(),
        }
    }
}

impl RouteTable {
    pub(crate) fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.entry != default.entry {
            self.entry = other.entry.clone();
        }
        if other.setup != default.setup {
            self.setup = other.setup.clone();
        }
        if other.landing != default.landing {
            self.landing = other.landing.clone();
        }
        if other.login_alias != default.login_alias {
            self.login_alias = other.login_alias.clone();
        }
    }
}

/// Projects the current gate state and requested path to a decision.
///
/// | State | Requested | Decision |
/// |-------|-----------|----------|
/// | `Unknown`, `CheckingAccount` | any | loading placeholder, stay put |
/// | `LoggedOut` | entry | entry screen |
/// | `LoggedOut` | other | redirect to entry |
/// | `NeedsSetup` | setup | setup screen |
/// | `NeedsSetup` | other | redirect to setup |
/// | `Faulted` | like `NeedsSetup` | retry screen instead of setup form |
/// | `Ready` | setup or sign-in alias | redirect to landing |
/// | `Ready` | other | protected screen, stay put |
#[must_use]
pub fn route(state: GateState, requested: &str, table: &RouteTable) -> RouteDecision {
    match state {
        GateState::Unknown | GateState::CheckingAccount => stay(Screen::Loading, requested),
        GateState::LoggedOut => {
            if requested == table.entry {
                stay(Screen::Entry, requested)
            } else {
                divert(Screen::Entry, &table.entry)
            }
        }
        GateState::NeedsSetup => confine(Screen::Setup, requested, table),
        GateState::Faulted => confine(Screen::Retry, requested, table),
        GateState::Ready => {
            if requested == table.setup || requested == table.login_alias {
                divert(Screen::Protected, &table.landing)
            } else {
                stay(Screen::Protected, requested)
            }
        }
    }
}

fn stay(screen: Screen, path: &str) -> RouteDecision {
    RouteDecision {
        screen,
        render_path: path.to_string(),
        redirect: None,
    }
}

fn divert(screen: Screen, target: &str) -> RouteDecision {
    RouteDecision {
        screen,
        render_path: target.to_string(),
        redirect: Some(target.to_string()),
    }
}

/// Setup and fault confinement share one shape: only the setup path passes.
fn confine(screen: Screen, requested: &str, table: &RouteTable) -> RouteDecision {
    if requested == table.setup {
        stay(screen, requested)
    } else {
        divert(screen, &table.setup)
    }
}
