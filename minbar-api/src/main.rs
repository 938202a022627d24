//! minbar-api — HTTP backend service for the Minbar education platform
//!
//! Authentication gating, payment-intent creation, recitation audio
//! upload and multi-mirror source resolution, geolocation, and the
//! translation stub.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use minbar_api::{build_router, AppState};
use minbar_common::config::{Config, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "minbar-api", about = "Minbar platform backend service", version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, env = "MINBAR_CONFIG")]
    config: Option<PathBuf>,

    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Public document root (overrides config)
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification logged immediately for startup feedback
    info!(
        "Starting Minbar backend (minbar-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = Config::resolve(&ConfigOverrides {
        config_file: cli.config,
        port: cli.port,
        database: cli.database,
        public_dir: cli.public_dir,
    })?;

    let pool = minbar_common::db::init_database(&config.database_path).await?;

    // Startup housekeeping: drop stale sessions left by the auth service
    match minbar_common::auth::purge_expired_sessions(&pool).await {
        Ok(0) => {}
        Ok(purged) => info!("Purged {} expired sessions", purged),
        Err(e) => warn!("Session purge failed: {}", e),
    }

    if config.payment_api_key.is_none() {
        warn!("Payment processor key not configured; payment endpoints will fail");
    }

    let address = format!("{}:{}", config.host, config.port);
    let state = AppState::new(pool, config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("minbar-api listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
