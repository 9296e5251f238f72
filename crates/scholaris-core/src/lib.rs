//! # Scholaris Core
//!
//! Core types and errors shared by the Scholaris crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//!
//! # Example
//!
//! ```ignore
//! use scholaris_core::{AppError, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//!
//! let params = PaginationParams::default();
//! let offset = params.offset();
//! ```

pub mod errors;
pub mod pagination;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
