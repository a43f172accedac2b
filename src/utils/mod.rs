//! Shared helpers for input validation and limits.

pub mod validation;
