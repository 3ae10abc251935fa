//! Shared utilities: constants, the crate error type, and time helpers.

pub mod constants;
pub mod error;
pub mod time;
