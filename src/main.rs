//! Funnel bot - scripted WhatsApp deposit funnel
//!
//! Greets inbound contacts, walks them through a fixed menu, collects and
//! validates a deposit form, and hands them off to an attendant or to the
//! payment confirmation step.

mod api;
mod config;
mod form;
mod gateway;
mod messages;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::BotConfig;
use gateway::{connect_with_retries, BridgeGateway};
use runtime::{InMemorySessionStore, ProductionRuntime, TokioPacer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Webhook events waiting for the runtime
const EVENT_QUEUE_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "funnel_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(
        port = config.port,
        bridge = %config.bridge_url,
        policy = ?config.policy,
        "Configuration loaded"
    );

    let gateway = Arc::new(BridgeGateway::new(&config.bridge_url)?);

    // The bridge may still be pairing; exhausting the retries ends the process
    connect_with_retries(
        gateway.as_ref(),
        &TokioPacer,
        config.startup_retries,
        config.startup_backoff,
    )
    .await?;

    let store = Arc::new(InMemorySessionStore::new());
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_SIZE);

    let runtime: ProductionRuntime = ProductionRuntime::new(
        config.turn_context(),
        Arc::clone(&store),
        gateway,
        TokioPacer,
    );
    tokio::spawn(runtime.run(event_rx));

    let app = create_router(AppState::new(event_tx, store)).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Funnel bot webhook listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
