//! Domain model for registered users.
//!
//! # Responsibility
//! - Define the validated `UserRecord` and its raw form input.
//! - Own the field validators shared by write and read paths.
//!
//! # Invariants
//! - A `UserRecord` produced by `validate` always passes every field check.
//! - Validation reports exactly one error, in fixed field order.

pub mod user;
pub mod validation;
