// src/repositories/mapping.rs
//
// Column decoding shared by the SQLite repositories.
//
// Every parse failure becomes a rusqlite conversion error carrying the
// column and offending value, never a silent default.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use uuid::Uuid;

fn conversion_error(column: &str, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("column '{}': {}", column, message),
        )),
    )
}

pub(crate) fn uuid_col(row: &Row, column: &str) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(column)?;
    Uuid::parse_str(&raw)
        .map_err(|e| conversion_error(column, format!("invalid UUID '{}': {}", raw, e)))
}

pub(crate) fn opt_uuid_col(row: &Row, column: &str) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| conversion_error(column, format!("invalid UUID '{}': {}", s, e)))
    })
    .transpose()
}

pub(crate) fn timestamp_col(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, format!("invalid timestamp '{}': {}", raw, e)))
}

pub(crate) fn json_col<T: DeserializeOwned>(row: &Row, column: &str) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| conversion_error(column, format!("invalid JSON: {}", e)))
}

/// Decode a column through the type's `FromStr` (stored enums)
pub(crate) fn parsed_col<T>(row: &Row, column: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(column)?;
    raw.parse::<T>()
        .map_err(|e| conversion_error(column, format!("'{}': {}", raw, e)))
}

pub(crate) fn u32_col(row: &Row, column: &str) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(column)?;
    u32::try_from(raw).map_err(|_| conversion_error(column, format!("{} out of range", raw)))
}
