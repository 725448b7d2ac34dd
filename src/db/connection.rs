// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create the connection pool described by the config.
///
/// The parent directory of the database file is created if missing.
pub fn create_connection_pool(config: &StoreConfig) -> AppResult<ConnectionPool> {
    let db_path = config.resolve_database_path()?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    create_connection_pool_at(&db_path, config.pool_max_size, config.busy_timeout_ms)
}

/// Create a connection pool over an explicit database file
///
/// Every connection gets:
/// - Foreign keys enabled (not default in SQLite)
/// - WAL journal for concurrent readers
/// - Busy timeout so writers wait instead of failing immediately
pub fn create_connection_pool_at(
    db_path: &Path,
    max_size: u32,
    busy_timeout_ms: u32,
) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))
    });

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    log::debug!(
        "Connection pool ready at {} (max {} connections)",
        db_path.display(),
        max_size
    );

    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone in-memory connection with foreign keys enabled
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory().map_err(AppError::Database)?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(AppError::Database)?;

    Ok(conn)
}

/// File-backed, fully migrated pool for tests.
///
/// The `TempDir` must outlive the pool; dropping it deletes the database.
#[cfg(test)]
pub fn test_pool() -> (tempfile::TempDir, std::sync::Arc<ConnectionPool>) {
    let dir = tempfile::tempdir().unwrap();
    let pool = create_connection_pool_at(&dir.path().join("test.db"), 4, 5000).unwrap();
    {
        let conn = pool.get().unwrap();
        crate::db::initialize_database(&conn).unwrap();
    }
    (dir, std::sync::Arc::new(pool))
}
