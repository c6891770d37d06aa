//! Runtime configuration for locating the store.
//!
//! # Invariants
//! - An explicit path always wins over `REGISTRY_DB_PATH`.
//! - Blank values are treated as unset.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database file location.
pub const DB_PATH_ENV: &str = "REGISTRY_DB_PATH";
/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "user_data.db";

/// Resolves the database path from an explicit value, the environment, or
/// the default file in the working directory.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    let from_env = std::env::var(DB_PATH_ENV).ok();
    pick_db_path(explicit, from_env.as_deref())
}

fn pick_db_path(explicit: Option<&Path>, from_env: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return path.to_path_buf();
    }
    match from_env.map(str::trim) {
        Some(raw) if !raw.is_empty() => PathBuf::from(raw),
        _ => PathBuf::from(DEFAULT_DB_FILE_NAME),
    }
}
