//! Login Flow Example
//!
//! Demonstrates the full gate lifecycle against scripted collaborators:
//! 1. Start logged out; every path redirects to the entry page
//! 2. Sign in as an unprovisioned user; get confined to account setup
//! 3. Finish setup; the provider re-announces the session and the gate
//!    re-checks on a fresh token
//! 4. Sign out; protected paths lock again
//!
//! # Usage
//!
//! ```bash
//! cargo run --example login_flow
//!
//! # With gate internals visible:
//! RUST_LOG=debug cargo run --example login_flow
//! ```

use anyhow::Result;
use doorman_gate::{GateConfig, GateRunner, RouteDecision};
use doorman_probe::testing::ScriptedProbe;
use doorman_probe::Provisioning;
use doorman_source::testing::ScriptedSource;
use doorman_types::{GateState, IdentityId};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

fn show(label: &str, decision: &RouteDecision) {
    match &decision.redirect {
        Some(target) => println!(
            "  {label}: {:?} screen, redirect -> {target}",
            decision.screen
        ),
        None => println!(
            "  {label}: {:?} screen at {}",
            decision.screen, decision.render_path
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("=== Doorman Login Flow ===\n");

    // Defaults unless a doorman.toml sits next to the binary.
    let config = GateConfig::load("doorman.toml")?;
    println!("Profile endpoint: {}", config.backend.profile_url());
    println!("Setup path:       {}\n", config.routes.setup);

    let source = ScriptedSource::new();
    let probe = ScriptedProbe::new();
    probe.script(Ok(Provisioning::Incomplete));

    let (runner, mut gate) = GateRunner::with_routes(
        Arc::new(source.clone()),
        Arc::new(probe.clone()),
        config.routes.clone(),
    );
    tokio::spawn(runner.run());

    gate.wait_for(GateState::LoggedOut).await;
    println!("Logged out:");
    show("request /settings", &gate.decide("/settings"));

    println!("\nSigning in as a brand-new user...");
    source.sign_in(IdentityId::new("demo-user"));
    gate.wait_for(GateState::NeedsSetup).await;
    println!("Account not provisioned yet:");
    show("request /", &gate.decide("/"));
    show("request /setaccount", &gate.decide("/setaccount"));

    println!("\nSetup complete, provider re-announces the session...");
    source.emit_current();
    gate.wait_for(GateState::Ready).await;
    println!("Ready ({} forced mints so far):", source.forced_mint_count());
    show("request /settings", &gate.decide("/settings"));
    show("request /setaccount", &gate.decide("/setaccount"));

    println!("\nSigning out...");
    source.sign_out();
    gate.wait_for(GateState::LoggedOut).await;
    show("request /settings", &gate.decide("/settings"));

    println!("\n=== Flow Complete ===");
    Ok(())
}
