//! Cardioserve - Heart disease prediction service
//!
//! Serves `POST /predict` over four pre-trained classifiers, and, when a
//! `DATABASE_URL` is configured, logs every prediction to SQLite and exposes
//! the chronological log at `GET /history`.
//!
//! # Usage
//! ```sh
//! ARTIFACT_DIR=artifacts DATABASE_URL=sqlite://data/predictions.db cargo run
//! ```
//!
//! # Environment Variables
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0:5000)
//! - `ARTIFACT_DIR` - Directory with scaler.json + model_*.onnx (default: artifacts)
//! - `DATABASE_URL` - SQLite URL for the audit log; unset runs stateless

use anyhow::Result;
use cardioserve::application::artifacts::ModelState;
use cardioserve::config::Config;
use cardioserve::infrastructure::persistence::{Database, SqlitePredictionRepository};
use cardioserve::interfaces::http::{self, AppState};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Cardioserve {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: bind={}, artifacts={:?}, audit_log={}",
        config.bind_addr,
        config.artifact_dir,
        config.database_url.is_some()
    );

    // Artifacts load once; a failed load degrades to not-ready instead of
    // exiting, so the endpoint stays up and reports the condition.
    let models = ModelState::load_or_degrade(&config.artifact_dir);
    if !models.is_ready() {
        warn!("Serving degraded: /predict will answer not-ready until artifacts are restored.");
    }

    let repo = match &config.database_url {
        Some(url) => {
            let db = Database::new(url).await?;
            Some(Arc::new(SqlitePredictionRepository::new(db.pool.clone())))
        }
        None => {
            info!("No DATABASE_URL configured; running stateless (no audit log, no /history).");
            None
        }
    };

    let app = http::router(AppState { models, repo });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received. Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
