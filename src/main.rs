// SPDX-License-Identifier: MIT

//! Campus-Board headless runner.
//!
//! Establishes the identity session, opens the live subscriptions, and logs
//! snapshot sizes until interrupted. Useful for smoke-testing a deployment
//! without the presentation layer.

use campus_board::{
    config::Config,
    db::Store,
    identity::{FirebaseIdentity, IdentitySession},
    sync::CollectionSync,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        app_instance = %config.app_instance_id,
        "Starting Campus-Board sync core"
    );

    let store = Store::connect(&config.gcp_project_id, &config.app_instance_id)
        .await
        .expect("Failed to connect to Firestore");

    let provider = FirebaseIdentity::new(&config).expect("Failed to initialize identity provider");

    let session = IdentitySession::new();
    let state = session
        .establish(&provider, config.bootstrap_token.as_deref())
        .await;

    let mut sync = CollectionSync::new(Arc::new(store));
    sync.start(&state);
    if !sync.is_running() {
        tracing::error!("identity session did not become ready; nothing to sync");
        return Ok(());
    }

    let mut events = sync.events();
    let mut notices = sync.notices();
    let mut scores = sync.scores();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = events.changed() => {
                if changed.is_err() { break; }
                let state = events.borrow_and_update();
                tracing::info!(count = state.items.len(), "events snapshot");
            }
            changed = notices.changed() => {
                if changed.is_err() { break; }
                let state = notices.borrow_and_update();
                tracing::info!(count = state.items.len(), "notices snapshot");
            }
            changed = scores.changed() => {
                if changed.is_err() { break; }
                let state = scores.borrow_and_update();
                tracing::info!(count = state.items.len(), "scores snapshot");
            }
        }
    }

    sync.stop();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("campus_board=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
