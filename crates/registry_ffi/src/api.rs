//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose the `submit` and `search` triggers as sync FRB functions.
//! - Turn core outcomes into flat response envelopes for display.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens its own connection and drops it before returning.

use chrono::NaiveDate;
use log::error;
use registry_core::db::open_db;
use registry_core::{
    init_logging as init_logging_inner, resolve_db_path as resolve_db_path_inner, DobInput,
    LookupOutcome, RawUserFields, RegistrationError, RegistrationService, SqliteUserRepository,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Calendar date selected in a date-picker widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Raw registration form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    /// Free-text date, used when `dob_picked` is `None`.
    pub dob_text: String,
    /// Date-picker value; takes precedence over `dob_text`.
    pub dob_picked: Option<PickedDate>,
}

/// Response envelope for the `submit` trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    /// Whether the record was stored.
    pub ok: bool,
    /// Stored (trimmed) name on success.
    pub name: Option<String>,
    /// Stable error code on failure (`invalid_name`, `duplicate_key`, ...).
    pub error_code: Option<String>,
    /// Human-readable message for the status line or error dialog.
    pub message: String,
}

impl RegisterResponse {
    fn success(name: String) -> Self {
        Self {
            ok: true,
            message: format!("User '{name}' registered successfully!"),
            name: Some(name),
            error_code: None,
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            name: None,
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// Label/value pair for lookup display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub label: String,
    pub value: String,
}

/// Response envelope for the `search` trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    /// Whether a record matched.
    pub found: bool,
    /// Record fields in display order; empty when not found.
    pub fields: Vec<FieldPair>,
    /// Stable error code when the lookup failed (`missing_name`,
    /// `storage_unavailable`, ...); `None` for found and not-found.
    pub error_code: Option<String>,
    /// Human-readable message (`Details do not exist.` when not found).
    pub message: String,
}

impl LookupResponse {
    fn not_found() -> Self {
        Self {
            found: false,
            fields: Vec::new(),
            error_code: None,
            message: LookupOutcome::NOT_FOUND_MESSAGE.to_string(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            found: false,
            fields: Vec::new(),
            error_code: Some(code.to_string()),
            message: message.into(),
        }
    }
}

/// Validates and stores one registration form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn register_user(request: RegisterUserRequest) -> RegisterResponse {
    register_user_at(&resolve_db_path(), &request)
}

/// Looks up one record by exact name.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn lookup_user(name: String) -> LookupResponse {
    lookup_user_at(&resolve_db_path(), &name)
}

fn register_user_at(db_path: &Path, request: &RegisterUserRequest) -> RegisterResponse {
    let raw = to_raw_fields(request);
    let fallback = RegisterResponse::failure("unexpected", UNEXPECTED_ERROR_MESSAGE);
    guarded("register_user", fallback, || {
        match with_service(db_path, |service| service.register(&raw)) {
            Ok(record) => RegisterResponse::success(record.name),
            Err(err) => RegisterResponse::failure(err.code(), err.to_string()),
        }
    })
}

fn lookup_user_at(db_path: &Path, name: &str) -> LookupResponse {
    let fallback = LookupResponse::failure("unexpected", UNEXPECTED_ERROR_MESSAGE);
    guarded("lookup_user", fallback, || {
        match with_service(db_path, |service| service.lookup(name)) {
            Ok(LookupOutcome::Found(stored)) => LookupResponse {
                found: true,
                fields: stored
                    .display_fields()
                    .into_iter()
                    .map(|(label, value)| FieldPair {
                        label: label.to_string(),
                        value,
                    })
                    .collect(),
                error_code: None,
                message: format!("Found '{}'.", stored.record.name),
            },
            Ok(LookupOutcome::NotFound) => LookupResponse::not_found(),
            Err(err) => LookupResponse::failure(err.code(), err.to_string()),
        }
    })
}

// A picked triple that is not a calendar day falls back to its text form,
// so the validator rejects it at the dob step and field order still holds.
fn to_raw_fields(request: &RegisterUserRequest) -> RawUserFields {
    let dob = match request.dob_picked {
        Some(picked) => match NaiveDate::from_ymd_opt(picked.year, picked.month, picked.day) {
            Some(date) => DobInput::Structured(date),
            None => DobInput::RawText(format!(
                "{:04}-{:02}-{:02}",
                picked.year, picked.month, picked.day
            )),
        },
        None => DobInput::RawText(request.dob_text.clone()),
    };

    RawUserFields {
        name: request.name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        age: request.age.clone(),
        dob,
    }
}

fn with_service<T>(
    db_path: &Path,
    f: impl FnOnce(&RegistrationService<SqliteUserRepository<'_>>) -> Result<T, RegistrationError>,
) -> Result<T, RegistrationError> {
    let conn = open_db(db_path).map_err(|err| RegistrationError::Storage(err.into()))?;
    let repo = SqliteUserRepository::new(&conn);
    let service = RegistrationService::new(repo);
    f(&service)
}

fn guarded<T>(operation: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error!("event=ffi_call module=ffi status=error op={operation} error_code=panic");
            fallback
        }
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH.get_or_init(|| resolve_db_path_inner(None)).clone()
}
