use registry_core::db::schema::{ensure_schema, table_exists, USERS_TABLE};
use registry_core::db::{open_db, open_db_in_memory, DbError};
use registry_core::{RepoError, SqliteUserRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_users_table() {
    let conn = open_db_in_memory().unwrap();
    assert!(table_exists(&conn, USERS_TABLE).unwrap());
}

#[test]
fn ensure_schema_twice_keeps_single_table() {
    let conn = open_db_in_memory().unwrap();
    ensure_schema(&conn).unwrap();
    ensure_schema(&conn).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_data.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO users (name, email, phone, age, dob)
             VALUES ('Jane', 'jane@x.com', '5551234567', 30, '1994-05-01');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    let rows: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn users_table_is_keyed_by_name() {
    let conn = open_db_in_memory().unwrap();
    let pk_columns: Vec<String> = conn
        .prepare("SELECT name FROM pragma_table_info('users') WHERE pk > 0;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pk_columns, ["name"]);
}

#[test]
fn open_db_in_missing_directory_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("user_data.db");

    assert!(open_db(&path).is_err());
}

#[test]
fn created_at_defaults_to_insert_time() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users (name, email, phone, age, dob)
         VALUES ('Jane', 'jane@x.com', '5551234567', 30, '1994-05-01');",
        [],
    )
    .unwrap();

    let created_at: String = conn
        .query_row("SELECT created_at FROM users WHERE name = 'Jane';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(created_at.len(), "YYYY-MM-DD HH:MM:SS".len());
}


#[test]
fn legacy_autoincrement_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_data.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            age INTEGER NOT NULL,
            dob TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );",
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::IncompatibleSchema(reason) => assert!(reason.contains("id"), "{reason}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn legacy_table_without_created_at_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_data.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            name TEXT PRIMARY KEY,
            email TEXT,
            phone TEXT,
            age INTEGER,
            dob TEXT
        );",
    )
    .unwrap();

    let err = SqliteUserRepository::try_new(&conn).unwrap_err();
    assert_eq!(err.code(), "storage_unavailable");
    match err {
        RepoError::StorageUnavailable(DbError::IncompatibleSchema(reason)) => {
            assert!(reason.contains("created_at"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
