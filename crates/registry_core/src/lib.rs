//! Core domain logic for the user registry.
//! This crate is the single source of truth for validation and persistence rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::resolve_db_path;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{DobInput, RawUserFields, StoredUser, UserRecord};
pub use model::validation::{validate, ValidationError};
pub use repo::user_repo::{RepoError, RepoResult, SqliteUserRepository, UserRepository};
pub use service::registration_service::{LookupOutcome, RegistrationError, RegistrationService};
