//! Mini KV - A write-through key-value cache server
//!
//! Serves integer-keyed string values from an in-memory LRU cache kept
//! coherent with a durable SQLite store that owns every write.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_kv::api::create_router;
use mini_kv::{AppState, Config};

/// Main entry point for the Mini KV server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build a runtime whose blocking pool is capped at `WORKERS`
/// 4. Create the write-through service and probe the store once
/// 5. Serve HTTP until SIGINT/SIGTERM
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_kv=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini KV Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, database={}, ping_interval={}s, workers={}, port={}",
        config.cache_capacity,
        config.database_path.display(),
        config.ping_interval_secs,
        config.workers,
        config.server_port
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.workers)
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);
    info!("Cache initialized with capacity {}", config.cache_capacity);

    // An unreachable store is not fatal: every request retries the connection
    let service = state.service.clone();
    let reachable = tokio::task::spawn_blocking(move || service.store().ping())
        .await
        .context("startup store probe panicked")?;
    if reachable {
        info!("Store reachable at {}", config.database_path.display());
    } else {
        warn!(
            "Store unreachable at {}, serving anyway",
            config.database_path.display()
        );
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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
}
