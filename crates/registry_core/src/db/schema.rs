//! `users` table definition.
//!
//! # Invariants
//! - `name` is the primary key; a second row with the same name is rejected.
//! - `created_at` is assigned by SQLite at insert time.
//! - A pre-existing `users` table with another layout is rejected, not reused.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// Table holding one row per registered user.
pub const USERS_TABLE: &str = "users";

const CREATE_USERS_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    name TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    age INTEGER NOT NULL,
    dob TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);";

/// Creates the `users` table when absent.
///
/// Idempotent; safe to call on every startup. Fails with
/// `DbError::IncompatibleSchema` when an existing table is not keyed by
/// `name` alone or lacks `created_at`.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CREATE_USERS_SQL)?;
    check_users_layout(conn)
}

fn check_users_layout(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name, pk FROM pragma_table_info('users');")?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let pk_columns: Vec<&str> = columns
        .iter()
        .filter(|(_, pk)| *pk > 0)
        .map(|(name, _)| name.as_str())
        .collect();
    if pk_columns != ["name"] {
        return Err(DbError::IncompatibleSchema(format!(
            "primary key must be `name`, found [{}]",
            pk_columns.join(", ")
        )));
    }

    if !columns.iter().any(|(name, _)| name == "created_at") {
        return Err(DbError::IncompatibleSchema(
            "missing `created_at` column".to_string(),
        ));
    }

    Ok(())
}

/// Returns whether a table with `table_name` exists.
pub fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
