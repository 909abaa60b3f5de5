//! SQLite connection pool management
//!
//! Provides utilities for creating and managing database connection pools.

use oldvrs_core::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{info, warn};

/// Default maximum number of connections in the pool
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT: u64 = 30;

/// Default idle timeout in seconds
const DEFAULT_IDLE_TIMEOUT: u64 = 600;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool on an existing SQLite file
///
/// The file is never created: a missing database is a startup failure.
///
/// # Arguments
///
/// * `path` - path of the database file (e.g. "cdrs.db")
/// * `max_connections` - Maximum number of connections in the pool (None = default)
/// * `acquire_timeout` - Seconds to wait for a free connection (None = default)
///
/// # Example
///
/// ```no_run
/// use oldvrs_db::create_pool;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool("cdrs.db", None, None).await?;
///     Ok(())
/// }
/// ```
pub async fn create_pool(
    path: &str,
    max_connections: Option<u32>,
    acquire_timeout: Option<u64>,
) -> AppResult<SqlitePool> {
    info!("Creating database connection pool for {}", path);

    let max_conns = max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(false)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(
            acquire_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        ))
        .idle_timeout(Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT)))
        .test_before_acquire(true)
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!("Failed to create database pool: {}", e);
            AppError::Pool(format!("Failed to open database {}: {}", path, e))
        })?;

    info!(
        "Database pool created successfully with {} max connections",
        max_conns
    );

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Database health check failed: {}", e)))?;

    info!("Database connection verified");

    Ok(pool)
}

/// Create a connection pool from options
///
/// Provides more fine-grained control over connection parameters.
pub async fn create_pool_with_options(
    options: SqliteConnectOptions,
    max_connections: u32,
) -> AppResult<SqlitePool> {
    info!("Creating database connection pool with custom options");

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT))
        .connect_with(options)
        .await
        .map_err(|e| {
            warn!("Failed to create database pool: {}", e);
            AppError::Pool(format!("Failed to connect to database: {}", e))
        })?;

    info!("Database pool created successfully");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = create_pool("/nonexistent/dir/cdrs.db", Some(1), Some(1)).await;
        assert!(matches!(result, Err(AppError::Pool(_))));
    }

    #[tokio::test]
    async fn test_in_memory_pool() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = create_pool_with_options(options, 1).await.unwrap();

        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
