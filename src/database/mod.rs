use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings::DatabaseConfig;

/// Database-related errors
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

/// Create the connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    info!("Initializing database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(
        max_connections = config.max_connections,
        "Database connection pool initialized"
    );

    Ok(pool)
}

/// Run the embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    info!("Database migrations completed");
    Ok(())
}

/// Health snapshot reported by the readiness probe
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub response_time_ms: u64,
    pub active_connections: u32,
    pub idle_connections: u32,
}

/// Check connectivity with a trivial query
pub async fn health_check(pool: &PgPool) -> Result<DatabaseHealth, DatabaseError> {
    let start = std::time::Instant::now();

    let result = sqlx::query("SELECT 1").fetch_one(pool).await;
    let response_time = start.elapsed();

    match result {
        Ok(_) => Ok(DatabaseHealth {
            connected: true,
            response_time_ms: response_time.as_millis() as u64,
            active_connections: pool.size(),
            idle_connections: pool.num_idle() as u32,
        }),
        Err(e) => {
            warn!("Database health check failed: {}", e);
            Err(DatabaseError::HealthCheckFailed(e.to_string()))
        }
    }
}
