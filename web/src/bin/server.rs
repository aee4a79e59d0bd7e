//! Booking Service Server
//!
//! Main server process for the slot booking service.
//!
//! This binary:
//! - Loads configuration from the environment
//! - Wires the booking service over an in-memory slot store (a production
//!   document-store adapter plugs in through the same `SlotStore` trait)
//! - Serves the HTTP API until Ctrl+C
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use slotwell_core::environment::{BookingEnvironment, SystemClock};
use slotwell_core::BookingService;
use slotwell_testing::mocks::InMemorySlotStore;
use slotwell_web::{build_router, AppState, Config, LogOnlyNotificationSender};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,slotwell_web=debug,slotwell_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting booking service...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        admin_email = %config.booking.admin_email,
        "Configuration loaded"
    );

    // Wire the environment. The in-memory store starts empty; slots are
    // provisioned by an external admin process in a real deployment.
    let store = Arc::new(InMemorySlotStore::new());
    let environment = BookingEnvironment::new(
        Arc::new(SystemClock),
        store,
        LogOnlyNotificationSender::shared(),
        config.booking.admin_email.clone(),
        config.store_timeout(),
    );
    let state = AppState::new(BookingService::new(environment));

    // Serve until Ctrl+C
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Booking service is running");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
