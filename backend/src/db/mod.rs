//! Database connections for the admin CLI and integration tests
//!
//! Each `fitform` invocation runs one command and exits, so the pool opens
//! connections lazily and keeps none warm.

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

const APPLICATION_NAME: &str = "fitform";
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

fn connect_options(url: &str) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(url).context("Invalid database URL")?;
    Ok(options.application_name(APPLICATION_NAME))
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .min_connections(0)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Open a pool against the configured database
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = pool_options(config)
        .connect_with(connect_options(&config.url)?)
        .await
        .context("Failed to connect to database")?;

    info!(max_connections = config.max_connections, "Connected to database");
    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}
