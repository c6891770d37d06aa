//! Registration use-case service.
//!
//! # Responsibility
//! - Handle the `submit` trigger: validate raw fields, then insert.
//! - Handle the `search` trigger: exact-name lookup.
//!
//! # Invariants
//! - Nothing reaches the repository unless validation succeeded.
//! - Log events carry codes and timings only, never user field values.

use crate::model::user::{RawUserFields, StoredUser, UserRecord};
use crate::model::validation::{validate, ValidationError};
use crate::repo::user_repo::{RepoError, UserRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for registration and lookup use-cases.
#[derive(Debug)]
pub enum RegistrationError {
    /// A form field failed validation.
    Validation(ValidationError),
    /// Lookup was triggered with an empty name.
    MissingName,
    /// Persistence-layer failure, including duplicate names.
    Storage(RepoError),
}

impl RegistrationError {
    /// Stable machine-readable code for UI/FFI callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::MissingName => "missing_name",
            Self::Storage(err) => err.code(),
        }
    }
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MissingName => write!(f, "Please enter a name."),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::MissingName => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RegistrationError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RegistrationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// Result of a lookup by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(StoredUser),
    NotFound,
}

impl LookupOutcome {
    /// Message shown when no record matches.
    pub const NOT_FOUND_MESSAGE: &'static str = "Details do not exist.";
}

/// Registration service facade over repository implementations.
pub struct RegistrationService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> RegistrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates raw form fields and stores the resulting record.
    ///
    /// Returns the stored record so callers can echo the normalized name.
    pub fn register(&self, raw: &RawUserFields) -> Result<UserRecord, RegistrationError> {
        let started_at = Instant::now();

        let record = match validate(raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=user_register module=service status=rejected error_code={}",
                    err.code()
                );
                return Err(err.into());
            }
        };

        match self.repo.insert(&record) {
            Ok(()) => {
                info!(
                    "event=user_register module=service status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(record)
            }
            Err(err) => {
                warn!(
                    "event=user_register module=service status=error duration_ms={} error_code={}",
                    started_at.elapsed().as_millis(),
                    err.code()
                );
                Err(err.into())
            }
        }
    }

    /// Looks up one record by exact name.
    ///
    /// The key is matched as given; it is not trimmed or case-folded. Only
    /// the empty string is rejected.
    pub fn lookup(&self, name: &str) -> Result<LookupOutcome, RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::MissingName);
        }

        let started_at = Instant::now();
        let outcome = match self.repo.find_by_name(name)? {
            Some(stored) => LookupOutcome::Found(stored),
            None => LookupOutcome::NotFound,
        };

        info!(
            "event=user_lookup module=service status=ok found={} duration_ms={}",
            matches!(outcome, LookupOutcome::Found(_)),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}
