pub mod models;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the shared connection pool.
///
/// Connections are established lazily, so this succeeds even when the
/// database is unreachable at startup; the first query pays the connection
/// cost and reports the failure.
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let raw_url = config
        .url
        .as_ref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let url = url::Url::parse(raw_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.scheme() != "postgres" && url.scheme() != "postgresql" {
        return Err(DatabaseError::InvalidDatabaseUrl);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect_lazy(raw_url)?;

    info!(
        "Created database pool for {}",
        url.host_str().unwrap_or("localhost")
    );
    Ok(pool)
}

// Embedded schema migrations, applied in file order by the admin CLI.
const MIGRATIONS: &[(&str, &str)] = &[(
    "0001_create_tables",
    include_str!("../../migrations/0001_create_tables.sql"),
)];

/// Apply all embedded migrations. The statements are idempotent, so
/// re-running against an existing schema is safe.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, sql) in MIGRATIONS {
        pool.execute(*sql).await?;
        info!("Applied migration {}", name);
    }
    Ok(())
}
