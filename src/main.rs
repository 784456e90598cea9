//! # Posgate API Main Entry Point
//!
//! This is the main entry point for the Posgate API service.

use migration::MigratorTrait;
use posgate::{config::ConfigLoader, db, server::run_server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    telemetry::init_tracing(&config)?;
    tracing::info!(profile = %config.profile, "Loaded configuration");

    let pool = db::init_pool(&config).await?;
    migration::Migrator::up(&pool, None).await?;

    run_server(config, pool).await
}
