//! Shared utilities.
//!
//! - [`tracing`]: span helpers for business operations

pub mod tracing;
