//! Tenancy backend entry point.
//!
//! Loads configuration, initializes telemetry, wires the backend and runs
//! pending migrations. Transport layers bind on top of the wired services.

use anyhow::Context;
use tracing::info;

use tenancy_infrastructure::Backend;
use tenancy_shared::config::AppConfig;
use tenancy_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_telemetry();

    info!(app = %config.app.name, env = %config.app.env, "Starting tenancy backend");

    let backend = Backend::init(&config)
        .await
        .context("failed to wire the backend")?;
    backend
        .run_migrations()
        .await
        .context("failed to apply migrations")?;

    info!("Backend ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutting down");

    Ok(())
}
