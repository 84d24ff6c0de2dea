//! PostgreSQL connection pool

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_secs: 5,
        }
    }
}

/// Pool errors
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Create a PostgreSQL connection pool
///
/// # Errors
/// Returns an error if the database is unreachable
pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, PoolError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(PoolError::Connect)?;

    tracing::info!(
        max_connections = config.max_connections,
        "PostgreSQL pool created"
    );

    Ok(pool)
}

/// Apply pending migrations
///
/// # Errors
/// Returns an error if a migration fails
pub async fn run_migrations(pool: &PgPool) -> Result<(), PoolError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(PoolError::Migrate)?;

    tracing::info!("Database migrations applied");

    Ok(())
}
