//! # Lodge Server
//!
//! REST API server for the Lodge hotel management system.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  load config ──► open pool + migrations ──► build router   │
//! │        │                                                    │
//! │        ▼                                                    │
//! │  serve on 0.0.0.0:<port> until Ctrl+C / SIGTERM            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lodge_db::{Database, DbConfig};
use lodge_server::config::ServerConfig;
use lodge_server::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Lodge server...");

    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Database ready");

    let state = AppState::new(db);
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
