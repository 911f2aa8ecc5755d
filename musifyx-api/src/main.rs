//! MusifyX API server - main entry point
//!
//! Starts even when the database is unreachable: the offline backend then
//! reports every durable call as unavailable and all requests are served
//! from the simulated stores.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use musifyx_common::config::ServerConfig;
use musifyx_common::db::init_database;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use musifyx_api::coordinator::FallbackCoordinator;
use musifyx_api::simulated::SimulatedStores;
use musifyx_api::store::{DurableBackend, OfflineBackend, SqliteBackend};
use musifyx_api::{build_router, AppState};

/// Command-line arguments for musifyx-api
///
/// Each flag overrides the environment and the config file.
#[derive(Parser, Debug)]
#[command(name = "musifyx-api")]
#[command(about = "MusifyX music catalog backend")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long, env = "MUSIFYX_HOST")]
    host: Option<String>,

    /// Database URL (sqlite://...)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Directory for locally stored uploads
    #[arg(long, env = "MUSIFYX_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        if let Some(upload_dir) = self.upload_dir {
            config.upload_dir = upload_dir;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "musifyx_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting MusifyX API (musifyx-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let mut config = ServerConfig::load();
    args.apply(&mut config);

    if config.uses_default_secret() {
        warn!("JWT_SECRET not set; signing tokens with the built-in development secret");
    }
    if config.cloudinary.is_none() {
        info!("Cloudinary not configured; uploads are stored in {}", config.upload_dir.display());
    }

    let backend: Arc<dyn DurableBackend> =
        match init_database(&config.database_url, config.db_connect_timeout).await {
            Ok(pool) => {
                info!("✓ Connected to database");
                Arc::new(SqliteBackend::new(pool))
            }
            Err(e) => {
                error!("Failed to connect to database: {}", e);
                warn!("Running in simulation mode: all data is kept in memory");
                Arc::new(OfflineBackend::new())
            }
        };

    let coordinator = FallbackCoordinator::new(backend, SimulatedStores::seeded());
    let state = AppState::new(coordinator, &config);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("musifyx-api listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
