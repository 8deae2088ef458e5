//! metricdeck server
//!
//! - Config: YAML at `$METRICDECK_CONFIG` (default `metricdeck.yaml`)
//! - Storage: SQLite, migrated on open
//! - Optional seeding from JSON/CSV files on startup
//! - Graceful shutdown on Ctrl-C

use metricdeck_core::error::{MetricDeckError, Result};
use metricdeck_server::{app_state::AppState, config, logging, router};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("metricdeck-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    logging::init(&cfg.logging)?;

    let listen = cfg.server.listen_addr()?;
    let seed_on_startup = cfg.seed.on_startup;
    let state = AppState::new(cfg)?;

    if seed_on_startup {
        let report = state.seed().seed().await?;
        tracing::info!(inserted = report.inserted(), "startup seed complete");
    }

    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "metricdeck-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MetricDeckError::Internal(format!("server failed: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
