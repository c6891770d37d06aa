//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create the `users` table, insert one row, and look one row up by name.
//! - Map SQLite failures onto repository semantics.
//!
//! # Invariants
//! - `insert` is a single statement; a failed insert leaves no partial row.
//! - `find_by_name` is an exact, case-sensitive match on the stored key.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::ensure_schema;
use crate::db::DbError;
use crate::model::user::{StoredUser, UserRecord, DOB_FORMAT};
use crate::model::validation::{check_record, ValidationError};
use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const USER_SELECT_SQL: &str = "SELECT
    name,
    email,
    phone,
    age,
    dob,
    created_at
FROM users";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user persistence and lookup.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed its field checks before reaching SQL.
    Validation(ValidationError),
    /// A row with this name already exists.
    DuplicateKey(String),
    /// The store could not be opened, read, or written.
    StorageUnavailable(DbError),
    /// A persisted row does not satisfy record invariants.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateKey(_) => write!(f, "User with this name already exists."),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::DuplicateKey(_) | Self::InvalidData(_) => None,
        }
    }
}

impl RepoError {
    /// Stable machine-readable code for UI/FFI callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::DuplicateKey(_) => "duplicate_key",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::StorageUnavailable(DbError::Sqlite(value))
    }
}

/// Repository interface for user records.
pub trait UserRepository {
    fn ensure_schema(&self) -> RepoResult<()>;
    fn insert(&self, record: &UserRecord) -> RepoResult<()>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<StoredUser>>;
}

/// SQLite-backed user repository.
#[derive(Debug)]
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates a repository after making sure the `users` table exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let repo = Self::new(conn);
        repo.ensure_schema()?;
        Ok(repo)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn ensure_schema(&self) -> RepoResult<()> {
        ensure_schema(self.conn)?;
        Ok(())
    }

    fn insert(&self, record: &UserRecord) -> RepoResult<()> {
        check_record(record)?;

        let result = self.conn.execute(
            "INSERT INTO users (name, email, phone, age, dob)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.name.as_str(),
                record.email.as_str(),
                record.phone.as_str(),
                i64::from(record.age),
                record.dob_text(),
            ],
        );

        match result {
            Ok(_) => {
                debug!("event=user_insert module=repo status=ok");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => {
                warn!("event=user_insert module=repo status=error error_code=duplicate_key");
                Err(RepoError::DuplicateKey(record.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<StoredUser>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE name = ?1;"))?;

        let row = stmt.query_row([name], RawUserRow::read).optional()?;
        row.map(RawUserRow::into_stored).transpose()
    }
}

struct RawUserRow {
    name: String,
    email: String,
    phone: String,
    age: i64,
    dob: String,
    created_at: String,
}

impl RawUserRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            age: row.get("age")?,
            dob: row.get("dob")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_stored(self) -> RepoResult<StoredUser> {
        let age = u8::try_from(self.age).map_err(|_| {
            RepoError::InvalidData(format!("invalid age value `{}` in users.age", self.age))
        })?;
        let dob = NaiveDate::parse_from_str(&self.dob, DOB_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!("invalid date value `{}` in users.dob", self.dob))
        })?;

        let record = UserRecord {
            name: self.name,
            email: self.email,
            phone: self.phone,
            age,
            dob,
        };
        check_record(&record)
            .map_err(|err| RepoError::InvalidData(format!("{}: {err}", err.code())))?;

        Ok(StoredUser {
            record,
            created_at: self.created_at,
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}
