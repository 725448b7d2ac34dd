// src/db/migrations.rs
//
// Schema versioning for the local store
//
// PRINCIPLES:
// - Migrations are an ordered list, each applied exactly once
// - A store written by a newer build is refused, never downgraded
// - Re-running on an up-to-date store is a no-op

use rusqlite::Connection;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Ordered migrations. Entry `n` moves the store to version `n + 1`.
const MIGRATIONS: &[&str] = &[include_str!("../../schema.sql")];

/// Version a fully migrated store reports
pub const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

/// Bring the store up to `SCHEMA_VERSION`.
///
/// Each pending migration runs in its own transaction together with the
/// version bump, so a failure leaves the store at the previous version.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let current = get_schema_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Store schema version {} is newer than supported {}. Update the application.",
            current, SCHEMA_VERSION
        )));
    }

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index as i32 + 1;
        apply_migration(conn, version, sql)?;
        log::info!("Applied schema migration {}", version);
    }

    Ok(())
}

/// Highest applied version, 0 on a fresh store.
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !has_table {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn apply_migration(conn: &Connection, version: i32, sql: &str) -> AppResult<()> {
    let batch = format!(
        "BEGIN;
         {}
         INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES ({}, datetime('now'));
         COMMIT;",
        sql, version
    );

    conn.execute_batch(&batch).map_err(|e| {
        // A failed statement leaves the transaction open
        let _ = conn.execute_batch("ROLLBACK;");
        AppError::Other(format!("Schema migration {} failed: {}", version, e))
    })
}

/// Run SQLite's integrity check plus a foreign key check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if integrity != "ok" {
        return Err(AppError::Other(format!("Store integrity check failed: {}", integrity)));
    }

    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let dangling: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<_, _>>()?;

    if !dangling.is_empty() {
        return Err(AppError::Other(format!(
            "Dangling references in: {}",
            dangling.join(", ")
        )));
    }

    Ok(())
}

/// Row counts and file size, shown by the `stats` command
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub schema_version: i32,
    pub size_bytes: i64,
    pub product_count: i64,
    pub user_count: i64,
    pub order_count: i64,
    pub notification_count: i64,
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    Ok(DatabaseStats {
        schema_version: get_schema_version(conn)?,
        size_bytes: page_count * page_size,
        product_count: count_rows(conn, "products")?,
        user_count: count_rows(conn, "users")?,
        order_count: count_rows(conn, "orders")?,
        notification_count: count_rows(conn, "notifications")?,
    })
}

fn count_rows(conn: &Connection, table: &'static str) -> AppResult<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    Ok(count)
}
