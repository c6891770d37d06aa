//! UI binding surface for the user registry core.

pub mod api;
