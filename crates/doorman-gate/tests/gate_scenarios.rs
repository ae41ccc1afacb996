//! Integration tests for the full gate loop.
//!
//! Each test drives a real `GateRunner` with scripted collaborators: the
//! provider pushes session events, the probe answers provisioning checks,
//! and the test observes gate state and routing decisions through the
//! handle, exactly the way an embedding application would.

use doorman_gate::{GateHandle, GateRunner, RouteTable, Screen};
use doorman_probe::testing::ScriptedProbe;
use doorman_probe::{ProbeError, Provisioning};
use doorman_source::testing::ScriptedSource;
use doorman_source::SourceError;
use doorman_types::{GateState, IdentityId};
use std::sync::Arc;
use std::time::Duration;

fn uid(raw: &str) -> IdentityId {
    IdentityId::new(raw)
}

fn launch(source: &ScriptedSource, probe: &ScriptedProbe) -> GateHandle {
    let (runner, handle) = GateRunner::new(Arc::new(source.clone()), Arc::new(probe.clone()));
    tokio::spawn(runner.run());
    handle
}

/// Before the first session event, routing shows a placeholder everywhere.
#[tokio::test]
async fn gate_is_unknown_until_the_first_session_event() {
    let source = ScriptedSource::new();
    let probe = ScriptedProbe::new();
    let mut gate = launch(&source, &probe);

    // The runner task has not polled yet; only the initial snapshot exists.
    assert_eq!(gate.state(), GateState::Unknown);
    let decision = gate.decide("/settings");
    assert_eq!(decision.screen, Screen::Loading);
    assert_eq!(decision.redirect, None);

    assert!(gate.wait_for(GateState::LoggedOut).await);
}

/// Absent session: everything but the entry path redirects there.
#[tokio::test]
async fn absent_session_locks_to_the_entry_path() {
    let source = ScriptedSource::new();
    let probe = ScriptedProbe::new();
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::LoggedOut).await);

    let decision = gate.decide("/settings");
    assert_eq!(decision.screen, Screen::Entry);
    assert_eq!(decision.redirect.as_deref(), Some("/"));

    // No session, no provisioning traffic.
    assert_eq!(probe.calls(), 0);
    assert_eq!(source.mint_count(), 0);
}

/// Missing profile confines the user to account setup.
#[tokio::test]
async fn missing_profile_confines_to_setup() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    probe.script(Ok(Provisioning::Incomplete));
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::NeedsSetup).await);

    let decision = gate.decide("/");
    assert_eq!(decision.screen, Screen::Setup);
    assert_eq!(decision.redirect.as_deref(), Some("/setaccount"));

    // Requesting setup itself passes through unchanged.
    let re_entry = gate.decide("/setaccount");
    assert_eq!(re_entry.redirect, None);
}

/// Provisioned account reaches the protected app; setup is left behind.
#[tokio::test]
async fn provisioned_account_reaches_ready() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::Ready).await);

    let setup = gate.decide("/setaccount");
    assert_eq!(setup.screen, Screen::Protected);
    assert_eq!(setup.redirect.as_deref(), Some("/"));

    let protected = gate.decide("/settings");
    assert_eq!(protected.redirect, None);

    // Exactly one check, on a freshly forced token.
    assert_eq!(probe.calls(), 1);
    assert_eq!(source.forced_mint_count(), 1);
}

/// The race guard: a sign-out while a check is in flight wins over the
/// check's eventual answer.
#[tokio::test]
async fn stale_resolution_never_clobbers_logout() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    let release = probe.hold();
    let mut gate = launch(&source, &probe);

    // The check is in flight, blocked inside the probe.
    assert!(gate.wait_for(GateState::CheckingAccount).await);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(probe.calls(), 1);

    source.sign_out();
    assert!(gate.wait_for(GateState::LoggedOut).await);
    let logout_generation = gate.snapshot().generation;

    // The held check now answers "complete" for the superseded session.
    release.release();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(gate.state(), GateState::LoggedOut);
    assert_eq!(gate.snapshot().generation, logout_generation);
}

/// Rapid sign-in, sign-out, sign-in: only the newest session's answer
/// lands, whatever order the checks finish in.
#[tokio::test]
async fn rapid_relogin_settles_on_the_newest_session() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    let release = probe.hold();
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::CheckingAccount).await);
    source.sign_out();
    source.sign_in(uid("uid-2"));
    release.release();

    assert!(gate.wait_for(GateState::Ready).await);
    assert_eq!(gate.snapshot().generation.value(), 3);
    assert_eq!(probe.calls(), 2);
}

/// A transport failure faults the gate but leaves it fully operational.
#[tokio::test]
async fn probe_fault_is_recoverable() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    probe.script(Err(ProbeError::Transport {
        detail: "timed out".into(),
    }));
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::Faulted).await);
    let fault = gate.last_fault().expect("faulted gate should expose details");
    assert_eq!(fault.code, "PROBE_TRANSPORT");

    // Faulted confines like setup but renders the retry affordance.
    let decision = gate.decide("/bookmarks");
    assert_eq!(decision.screen, Screen::Retry);
    assert_eq!(decision.redirect.as_deref(), Some("/setaccount"));

    // The machine is not stuck: the next session event resolves normally.
    source.emit_current();
    assert!(gate.wait_for(GateState::Ready).await);
    assert!(gate.last_fault().is_none());
}

/// A token-mint failure is a fault too, and no check is attempted.
#[tokio::test]
async fn mint_failure_faults_without_probing() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    source.script_mint(Err(SourceError::Mint {
        reason: "provider offline".into(),
    }));
    let probe = ScriptedProbe::new();
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::Faulted).await);
    let fault = gate.last_fault().expect("faulted gate should expose details");
    assert_eq!(fault.code, "SOURCE_MINT_FAILED");
    assert_eq!(probe.calls(), 0);
}

/// Every check runs on its own freshly minted token; nothing is reused.
#[tokio::test]
async fn every_check_uses_a_fresh_token() {
    let source = ScriptedSource::signed_in(uid("uid-1"));
    let probe = ScriptedProbe::new();
    probe.script(Ok(Provisioning::Incomplete));
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::NeedsSetup).await);

    // Setup finished elsewhere; the provider re-announces the session and
    // the gate re-checks from scratch.
    source.emit_current();
    assert!(gate.wait_for(GateState::Ready).await);

    let tokens = probe.tokens();
    assert_eq!(tokens.len(), 2);
    assert_ne!(tokens[0], tokens[1]);
    assert_eq!(source.forced_mint_count(), 2);
}

/// The handle's route table can be swapped at construction.
#[tokio::test]
async fn custom_route_table_is_honored() {
    let source = ScriptedSource::new();
    let probe = ScriptedProbe::new();
    let routes = RouteTable {
        entry: "/welcome".into(),
        setup: "/onboarding".into(),
        landing: "/home".into(),
        login_alias: "/signin".into(),
    };
    let (runner, mut gate) =
        GateRunner::with_routes(Arc::new(source.clone()), Arc::new(probe.clone()), routes);
    tokio::spawn(runner.run());

    assert!(gate.wait_for(GateState::LoggedOut).await);
    assert_eq!(gate.decide("/feed").redirect.as_deref(), Some("/welcome"));
}

/// When the provider tears down its stream the runner stops and handles
/// learn about it.
#[tokio::test]
async fn runner_stops_when_the_provider_closes() {
    let source = ScriptedSource::new();
    let probe = ScriptedProbe::new();
    let mut gate = launch(&source, &probe);

    assert!(gate.wait_for(GateState::LoggedOut).await);

    source.close();
    assert!(!gate.changed().await);
}
