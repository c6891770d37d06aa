//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for user records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must re-check records before persistence.
//! - Primary-key conflicts surface as `DuplicateKey`, never as raw SQLite errors.

pub mod user_repo;
