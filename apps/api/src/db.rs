use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tables the profile store reads from.
const PROFILE_TABLES: [&str; 2] = ["users", "students"];

/// Opens the profile database pool and checks that the profile tables exist.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL (max {max_connections} connections)...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("Failed to connect to the profile database")?;

    for table in PROFILE_TABLES {
        let present: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(&pool)
            .await?;
        if !present {
            warn!("Profile table '{table}' is missing; lookups against it will fail");
        }
    }

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
