//! # Tariff API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup                                                                │
//! │    .env → TariffConfig::load()                                          │
//! │    TARIFF_DB_PATH set?                                                  │
//! │      yes → Database::new → load_all → TariffStore::from_entries         │
//! │      no  → empty TariffStore (uploads live until restart)               │
//! │    axum::serve(0.0.0.0:8000) until Ctrl+C / SIGTERM                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tariff_api::config::TariffConfig;
use tariff_api::state::AppState;
use tariff_core::TariffStore;
use tariff_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {}", e);
        }
    }

    init_tracing();

    info!("Starting tariff API server...");

    let config = TariffConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        persistent = config.db_path.is_some(),
        ingest_mode = %config.ingest_mode,
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    let state = match &config.db_path {
        Some(path) => {
            let db = Database::new(DbConfig::new(path)).await?;
            let entries = db.tariffs().load_all().await?;
            info!(tariffs = entries.len(), "Tariffs restored from database");

            let store = Arc::new(TariffStore::from_entries(entries));
            AppState::with_database(config.clone(), store, db)
        }
        None => {
            warn!("TARIFF_DB_PATH not set: uploaded tariffs are kept in memory only");
            AppState::new(config.clone())
        }
    };

    let db = state.db.clone();

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, tariff_api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tariff=trace` - Show trace for tariff crates only
/// - Default: `info,tariff=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tariff=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
