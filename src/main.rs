//! Book Reviews - books and their reviews over HTTP
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Build the persistence store (Postgres when configured, else in-memory)
//! 4. Build the cache and start the background TTL cleanup task
//! 5. Serve the router until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_reviews::api::create_router;
use book_reviews::cache::{CacheAside, MemoryCache};
use book_reviews::store::{BookStore, MemoryStore};
use book_reviews::{spawn_cleanup_task, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_reviews=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Book Reviews API");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        cache_ttl = config.cache_ttl,
        cache_max_entries = config.cache_max_entries,
        cache_timeout_ms = config.cache_timeout_ms,
        "Configuration loaded"
    );

    let store = build_store(&config).await?;

    let memory_cache = MemoryCache::new(config.cache_max_entries);
    let cleanup_handle = spawn_cleanup_task(
        memory_cache.clone(),
        Duration::from_secs(config.cleanup_interval.max(1)),
    );
    let cache = CacheAside::from_config(Arc::new(memory_cache), &config);

    let app = create_router(AppState::new(store, cache));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server terminated with an error")?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(feature = "postgres")]
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn BookStore>> {
    use book_reviews::store::PostgresStore;

    let Some(url) = config.database_url.as_deref() else {
        info!("DATABASE_URL not set, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let store = PostgresStore::connect(url, config.database_max_connections)
        .await
        .context("failed to connect to Postgres")?;
    store
        .ensure_schema()
        .await
        .context("failed to prepare database schema")?;
    info!("Postgres store connected");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn BookStore>> {
    if config.database_url.is_some() {
        warn!("DATABASE_URL is set but postgres support is not compiled in, using in-memory store");
    }
    Ok(Arc::new(MemoryStore::new()))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
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

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
