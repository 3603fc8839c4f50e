//! Collection Store - An in-memory TTL object store
//!
//! Provides named collections of individually expiring objects behind a JSON
//! HTTP API, with a background sweeper that evicts expired entries.

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use collection_store::{api::create_router, spawn_sweeper, AppState, Config};

/// Main entry point for the store server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration (`CONFIG_PATH` JSON file or environment)
/// 3. Create the store with its default collection
/// 4. Start the background expiration sweeper
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured address
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "collection_store=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Collection Store Server");

    let config = Config::load().context("couldn't load configuration")?;
    info!(
        "Configuration loaded: default_ttl={}s, max_collections={}, refresh_time={}s, refresh_timeout={}s, max_refreshes={}, auth={}",
        config.storage.default_ttl,
        config.storage.max_collections_count,
        config.storage.refresh_time,
        config.storage.refresh_timeout,
        config.storage.max_refreshes,
        config.server.auth.is_enabled()
    );

    // Create application state with the store
    let state = AppState::from_config(&config);
    info!("Store initialized");

    // Start background sweeper
    let sweeper_handle = spawn_sweeper(state.store.clone());
    info!("Background sweeper started");

    let app = create_router(state);

    let addr = config.server.url();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("couldn't bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweeper and allows graceful shutdown.
async fn shutdown_signal(sweeper_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweeper_handle.abort();
    warn!("Sweeper aborted");
}
