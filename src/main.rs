//! Order Cache - order ingestion with a read-through LRU cache
//!
//! Binary entry point: wires the store, cache, stream, ingestion loop and
//! HTTP server together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::api::{create_router, AppState};
use order_cache::cache::SharedCache;
use order_cache::models::OrderValidator;
use order_cache::storage::{InMemoryStorage, OrderStorage};
use order_cache::stream::MemoryStream;
use order_cache::{spawn_ingestion_task, warm, Config, IngestionLoop};

/// Main entry point for the order service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the order store and the cache
/// 4. Warm the cache from the store
/// 5. Start the ingestion loop on the order stream
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting order service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_size={}, port={}, recent_orders_limit={}, order_id_format={}",
        config.cache_size, config.http_port, config.recent_orders_limit, config.order_id_format
    );

    let storage: Arc<dyn OrderStorage> = Arc::new(InMemoryStorage::new());
    let cache = SharedCache::new(config.cache_size);

    // Must finish before ingestion and serving start.
    warm(&cache, storage.as_ref()).await;

    let stream = MemoryStream::new();
    let ingestion = IngestionLoop::new(
        Arc::new(stream.clone()),
        Arc::clone(&storage),
        cache.clone(),
        OrderValidator::new(config.order_id_format),
    )
    .with_receive_backoff(config.receive_backoff);
    let ingest_stats = ingestion.stats();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ingestion_handle = spawn_ingestion_task(Arc::new(ingestion), shutdown_rx);
    info!("Ingestion task started");

    let state = AppState::new(
        cache,
        storage,
        stream.clone(),
        ingest_stats,
        config.recent_orders_limit,
    );
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // Stop ingestion; an unacknowledged record stays on the stream.
    let _ = shutdown_tx.send(true);
    stream.close().await;
    if let Err(e) = ingestion_handle.await {
        warn!(error = %e, "Ingestion task ended abnormally");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
